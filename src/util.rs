use crate::error::ServiceError;
use rusoto_core::Region;
use rusoto_s3::{PutObjectRequest, S3Client, S3};
use std::str::FromStr;

pub fn parse_region(name: &str) -> Result<Region, ServiceError> {
    Region::from_str(name)
        .map_err(|_| ServiceError::internal_server_error(format!("Unable to parse region {}", name)))
}

pub async fn upload_object_to_s3(
    client: &S3Client,
    object: Vec<u8>,
    bucket: String,
    key: String,
) -> Result<(), ServiceError> {
    let request = PutObjectRequest {
        bucket,
        key,
        body: Some(object.into()),
        ..Default::default()
    };
    client
        .put_object(request)
        .await
        .map(|_| ())
        .map_err(ServiceError::internal_server_error)
}
