//! Upload integration tests: policy redemption and direct writes.

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use reqwest::multipart::{Form, Part};
    use stowage_core::{StowageConfig, WriteRequest};
    use stowage_store::UploadPolicy;

    use crate::{cleanup_bucket, s3_client, stowage, stowage_with, test_bucket_name};

    /// Redeem an upload policy the way a browser would: every form field
    /// verbatim, then the file part last.
    async fn redeem_policy(policy: &UploadPolicy, body: Vec<u8>) -> reqwest::Response {
        let mut form = Form::new();
        for (name, value) in &policy.fields {
            form = form.text(name.clone(), value.clone());
        }
        form = form.part("file", Part::bytes(body).file_name("upload.bin"));

        reqwest::Client::new()
            .post(&policy.url)
            .multipart(form)
            .send()
            .await
            .expect("POST to policy URL")
    }

    #[tokio::test]
    #[ignore = "requires S3-compatible endpoint"]
    async fn test_should_issue_policy_redeemable_by_multipart_post() {
        let client = s3_client();
        let bucket = test_bucket_name("policy");
        let stowage = stowage();

        let issued = stowage
            .issue_upload_policy(&bucket, Some("images"), None)
            .await
            .expect("issue policy");
        assert!(issued.address.key().starts_with("images/"));

        let resp = redeem_policy(&issued.policy, b"policy upload bytes".to_vec()).await;
        assert!(
            resp.status().is_success(),
            "policy redemption failed: {} {}",
            resp.status(),
            resp.text().await.unwrap_or_default()
        );

        let stored = client
            .get_object()
            .bucket(&bucket)
            .key(issued.address.key())
            .send()
            .await
            .expect("object exists at the reserved address");
        let data = stored.body.collect().await.expect("collect body").into_bytes();
        assert_eq!(data.as_ref(), b"policy upload bytes");

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires S3-compatible endpoint"]
    async fn test_should_bind_policy_to_configured_size_range() {
        let client = s3_client();
        let bucket = test_bucket_name("toolarge");
        let stowage = stowage_with(StowageConfig::builder().max_size_mb(1).build());

        let issued = stowage
            .issue_upload_policy(&bucket, None, None)
            .await
            .expect("issue policy");

        let resp = redeem_policy(&issued.policy, vec![0u8; 2 * 1024 * 1024]).await;
        assert!(
            resp.status().is_client_error(),
            "a 2 MiB body must violate the 1 MB policy condition, got {}",
            resp.status()
        );

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires S3-compatible endpoint"]
    async fn test_should_write_object_with_encoded_file_name_metadata() {
        let client = s3_client();
        let bucket = test_bucket_name("write");
        let stowage = stowage();

        let address = stowage
            .write_object(
                WriteRequest::builder()
                    .bucket(bucket.clone())
                    .scope(Some("docs".to_owned()))
                    .body(Bytes::from_static(b"direct write"))
                    .file_name(Some("résumé.pdf".to_owned()))
                    .file_size(Some(12))
                    .content_type("application/pdf".to_owned())
                    .build(),
            )
            .await
            .expect("write object");
        assert_eq!(address.bucket(), bucket);

        let head = client
            .head_object()
            .bucket(&bucket)
            .key(address.key())
            .send()
            .await
            .expect("head object");
        assert_eq!(head.content_type(), Some("application/pdf"));
        let metadata = head.metadata().expect("user metadata");
        assert_eq!(
            metadata.get("x-file-name").map(String::as_str),
            Some("r%C3%A9sum%C3%A9.pdf")
        );
        assert_eq!(metadata.get("x-file-size").map(String::as_str), Some("12"));

        cleanup_bucket(&client, &bucket).await;
    }
}
