//! Bucket provisioning integration tests.

#[cfg(test)]
mod tests {
    use crate::{cleanup_bucket, s3_client, stowage, test_bucket_name};

    #[tokio::test]
    #[ignore = "requires S3-compatible endpoint"]
    async fn test_should_provision_fresh_bucket_with_read_policy() {
        let client = s3_client();
        let bucket = test_bucket_name("provision");
        let stowage = stowage();

        stowage.ensure_bucket(&bucket).await.expect("ensure bucket");

        client
            .head_bucket()
            .bucket(&bucket)
            .send()
            .await
            .expect("bucket exists after ensure");

        let policy = client
            .get_bucket_policy()
            .bucket(&bucket)
            .send()
            .await
            .expect("bucket carries a policy")
            .policy
            .expect("policy document");
        assert!(policy.contains("s3:GetObject"));
        assert!(policy.contains(&format!("arn:aws:s3:::{bucket}/*")));

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires S3-compatible endpoint"]
    async fn test_should_be_idempotent_across_calls() {
        let client = s3_client();
        let bucket = test_bucket_name("idempotent");
        let stowage = stowage();

        stowage.ensure_bucket(&bucket).await.expect("first ensure");
        stowage.ensure_bucket(&bucket).await.expect("second ensure");

        client
            .head_bucket()
            .bucket(&bucket)
            .send()
            .await
            .expect("bucket exists");

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires S3-compatible endpoint"]
    async fn test_should_survive_concurrent_provisioning_of_fresh_bucket() {
        let client = s3_client();
        let bucket = test_bucket_name("race");
        let stowage = stowage();

        let (a, b) = tokio::join!(stowage.ensure_bucket(&bucket), stowage.ensure_bucket(&bucket));
        a.expect("first racer");
        b.expect("second racer");

        client
            .head_bucket()
            .bucket(&bucket)
            .send()
            .await
            .expect("exactly one bucket exists");

        cleanup_bucket(&client, &bucket).await;
    }
}
