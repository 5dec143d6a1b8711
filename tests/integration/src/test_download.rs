//! Download integration tests: grant redemption and direct fetches.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bytes::Bytes;
    use stowage_core::WriteRequest;

    use crate::{cleanup_bucket, s3_client, stowage, test_bucket_name};

    async fn write_named(
        stowage: &stowage_core::Stowage,
        bucket: &str,
        file_name: &str,
    ) -> String {
        stowage
            .write_object(
                WriteRequest::builder()
                    .bucket(bucket.to_owned())
                    .body(Bytes::from_static(b"download me"))
                    .file_name(Some(file_name.to_owned()))
                    .content_type("application/pdf".to_owned())
                    .build(),
            )
            .await
            .expect("write object")
            .to_string()
    }

    #[tokio::test]
    #[ignore = "requires S3-compatible endpoint"]
    async fn test_should_redeem_grant_with_pinned_headers() {
        let client = s3_client();
        let bucket = test_bucket_name("grant");
        let stowage = stowage();
        let address = write_named(&stowage, &bucket, "résumé.pdf").await;

        let grant = stowage
            .issue_download_grant(&address, None)
            .await
            .expect("issue grant");
        assert_eq!(grant.file_name, "résumé.pdf");
        assert_eq!(grant.expires_in_seconds, 300);

        let resp = reqwest::get(&grant.download_url)
            .await
            .expect("GET grant URL");
        assert!(resp.status().is_success(), "grant rejected: {}", resp.status());

        let disposition = resp
            .headers()
            .get(reqwest::header::CONTENT_DISPOSITION)
            .expect("disposition header")
            .to_str()
            .expect("header text");
        assert!(disposition.contains("attachment"));
        assert!(disposition.contains("filename=\"résumé.pdf\""));
        assert!(disposition.contains("filename*=UTF-8''r%C3%A9sum%C3%A9.pdf"));
        assert_eq!(
            resp.headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            Some("application/pdf")
        );

        let body = resp.bytes().await.expect("body");
        assert_eq!(body.as_ref(), b"download me");

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires S3-compatible endpoint"]
    async fn test_should_floor_tiny_ttls_to_a_redeemable_window() {
        let client = s3_client();
        let bucket = test_bucket_name("floor");
        let stowage = stowage();
        let address = write_named(&stowage, &bucket, "short.txt").await;

        let grant = stowage
            .issue_download_grant(&address, Some(Duration::from_secs(2)))
            .await
            .expect("issue grant");
        assert_eq!(grant.expires_in_seconds, 10);

        // 2 seconds would already be on the edge; the floored window is not.
        tokio::time::sleep(Duration::from_secs(4)).await;
        let resp = reqwest::get(&grant.download_url)
            .await
            .expect("GET grant URL");
        assert!(resp.status().is_success(), "grant expired early: {}", resp.status());

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires S3-compatible endpoint"]
    async fn test_should_fetch_bytes_through_facade() {
        let client = s3_client();
        let bucket = test_bucket_name("fetch");
        let stowage = stowage();
        let address = write_named(&stowage, &bucket, "résumé.pdf").await;

        let fetched = stowage.fetch_object(&address).await.expect("fetch object");
        assert_eq!(fetched.body.as_ref(), b"download me");
        assert_eq!(fetched.file_name, "résumé.pdf");
        assert_eq!(fetched.content_type, "application/pdf");

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires S3-compatible endpoint"]
    async fn test_should_report_missing_object_distinctly() {
        let client = s3_client();
        let bucket = test_bucket_name("missing");
        let stowage = stowage();
        stowage.ensure_bucket(&bucket).await.expect("ensure bucket");

        let err = stowage
            .fetch_object(&format!("s3:{bucket}:ghost"))
            .await
            .expect_err("nothing stored at the key");
        assert!(err.is_object_not_found(), "unexpected error: {err}");

        cleanup_bucket(&client, &bucket).await;
    }
}
