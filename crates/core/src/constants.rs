//! Shared constants used across formwork crates

/// Environment variable carrying the database endpoint to the container
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";

/// Environment variable carrying the bucket name to the container
pub const ENV_S3_BUCKET: &str = "S3_BUCKET";

/// Output label for the file bucket's engine-assigned name
pub const OUTPUT_BUCKET_NAME: &str = "BucketName";

/// Output label for the database endpoint hostname
pub const OUTPUT_DATABASE_ENDPOINT: &str = "DatabaseEndpoint";

/// Output label for the public load balancer address
pub const OUTPUT_LOAD_BALANCER_URL: &str = "LoadBalancerURL";

/// Output label for the user pool identifier
pub const OUTPUT_USER_POOL_ID: &str = "UserPoolId";

/// Port the application container listens on
pub const DEFAULT_CONTAINER_PORT: u16 = 3000;

/// Format marker written into every synthesized template
pub const TEMPLATE_FORMAT_VERSION: &str = "formwork/1";
