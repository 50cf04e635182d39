use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use revserve::areas::repository::Repository;
use revserve::server;
use revserve::server::listing::ListingTemplate;
use revserve::server::router::NO_REVISION_MESSAGE;
use revserve::server::state::ServerContext;
use rstest::rstest;
use std::path::Path;
use tower::ServiceExt;

mod common;
use common::command::{SampleRepository, packed_repository, sample_repository};

struct Reply {
    status: StatusCode,
    content_type: Option<String>,
    body: Vec<u8>,
}

impl Reply {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

fn default_template() -> ListingTemplate {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("templates")
        .join("directory.html");
    ListingTemplate::load(&path).expect("Failed to load listing template")
}

fn test_app(sample: &SampleRepository, domain: Option<&str>) -> axum::Router {
    test_app_with_template(sample, domain, default_template())
}

fn test_app_with_template(
    sample: &SampleRepository,
    domain: Option<&str>,
    listing: ListingTemplate,
) -> axum::Router {
    let repository = Repository::open(sample.path()).expect("Failed to open repository");
    server::app(ServerContext::new(
        repository,
        listing,
        domain.map(str::to_string),
    ))
}

async fn send(app: axum::Router, method: Method, host: &str, path: &str) -> Reply {
    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(path)
                .header(header::HOST, host)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|value| value.to_str().unwrap().to_string());
    let body = response.into_body().collect().await.unwrap().to_bytes().to_vec();

    Reply {
        status,
        content_type,
        body,
    }
}

async fn get(app: axum::Router, host: &str, path: &str) -> Reply {
    send(app, Method::GET, host, path).await
}

#[rstest]
#[tokio::test]
async fn root_listing_of_branch(sample_repository: SampleRepository) {
    let reply = get(test_app(&sample_repository, None), "main.example.org", "/").await;

    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.content_type.as_ref().unwrap().starts_with("text/html"));

    let body = reply.text();
    assert!(body.contains(r#"href="README.md">README.md</a>"#), "{body}");
    assert!(body.contains(">assets/</a>"), "{body}");
    assert!(body.contains(">docs/</a>"), "{body}");
    assert!(body.contains(">vendor/</a>"), "{body}");
    assert!(body.contains(">run.sh</a>"), "{body}");
    assert!(!body.contains("../"), "{body}");
}

#[rstest]
#[tokio::test]
async fn annotated_tag_serves_file_at_tagged_commit(sample_repository: SampleRepository) {
    let app = test_app(&sample_repository, Some("example.org"));

    let reply = get(app, "v1.0.0.example.org", "/README.md").await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.text(), common::README_V1);
    assert_eq!(reply.content_type.as_deref(), Some("text/markdown"));
}

#[rstest]
#[tokio::test]
async fn branch_serves_its_tip(sample_repository: SampleRepository) {
    let reply = get(test_app(&sample_repository, None), "main.example.org", "/README.md").await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.text(), common::README_V2);
}

#[rstest]
#[tokio::test]
async fn commit_hash_host_serves_that_commit(sample_repository: SampleRepository) {
    let host = format!("{}.example.org", sample_repository.first_commit);

    let reply = get(test_app(&sample_repository, None), &host, "/README.md").await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.text(), common::README_V1);
}

#[rstest]
#[case("/README.md")]
#[case("/")]
#[case("/docs/")]
#[tokio::test]
async fn unknown_revision_is_not_found(
    sample_repository: SampleRepository,
    #[case] path: &str,
) {
    let reply = get(test_app(&sample_repository, None), "doesnotexist.example.org", path).await;

    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert!(reply.text().contains("Commit not found"), "{}", reply.text());
}

#[rstest]
#[tokio::test]
async fn tag_that_annotates_no_commit_is_commit_not_found(sample_repository: SampleRepository) {
    let reply = get(test_app(&sample_repository, None), "treetag.example.org", "/").await;

    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert!(reply.text().starts_with("Commit not found: Tag treetag"), "{}", reply.text());
}

#[rstest]
#[case(Some("example.org"), "example.org")]
#[case(Some("example.org"), "main.example.com")]
#[case(None, "localhost")]
#[case(None, "localhost:8080")]
#[tokio::test]
async fn host_without_revision_gets_fallback_message(
    sample_repository: SampleRepository,
    #[case] domain: Option<&str>,
    #[case] host: &str,
) {
    let reply = get(test_app(&sample_repository, domain), host, "/README.md").await;

    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.text(), NO_REVISION_MESSAGE);
}

#[rstest]
#[tokio::test]
async fn javascript_gets_a_content_type(sample_repository: SampleRepository) {
    let reply = get(test_app(&sample_repository, None), "main.example.org", "/assets/app.js").await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.content_type.as_deref(), Some("application/javascript"));
    assert_eq!(reply.text(), common::APP_JS);
}

#[rstest]
#[tokio::test]
async fn unknown_extension_has_no_content_type(sample_repository: SampleRepository) {
    let reply = get(
        test_app(&sample_repository, None),
        "main.example.org",
        "/assets/unknownext.xyz",
    )
    .await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.content_type, None);
}

#[rstest]
#[case("/missing.txt")]
#[case("/docs")]
#[case("/binary.bin")]
#[tokio::test]
async fn unreadable_file_is_not_found(sample_repository: SampleRepository, #[case] path: &str) {
    let reply = get(test_app(&sample_repository, None), "main.example.org", path).await;

    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert!(reply.text().starts_with("File not found: "), "{}", reply.text());
}

#[rstest]
#[case("/missing/")]
#[case("/README.md/")]
#[tokio::test]
async fn unknown_directory_is_not_found(sample_repository: SampleRepository, #[case] path: &str) {
    let reply = get(test_app(&sample_repository, None), "main.example.org", path).await;

    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert!(reply.text().starts_with("Directory not found: "), "{}", reply.text());
}

#[rstest]
#[tokio::test]
async fn subdirectory_listing_links_relative_entries(sample_repository: SampleRepository) {
    let reply = get(test_app(&sample_repository, None), "main.example.org", "/docs/").await;

    assert_eq!(reply.status, StatusCode::OK);
    let body = reply.text();
    assert!(body.contains(r#"href="guide.md">guide.md</a>"#), "{body}");
    assert!(body.contains(r#"href="hello%20world.txt">hello world.txt</a>"#), "{body}");
    assert!(body.contains(">../</a>"), "{body}");
}

#[rstest]
#[tokio::test]
async fn percent_encoded_path_is_decoded(sample_repository: SampleRepository) {
    let reply = get(
        test_app(&sample_repository, None),
        "main.example.org",
        "/docs/hello%20world.txt",
    )
    .await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.text(), common::SPACED);
}

#[rstest]
#[case("/docs%2F")]
#[case("/docs%2Fguide.md")]
#[case("/docs%2fguide.md")]
#[tokio::test]
async fn encoded_slash_is_not_a_separator(
    sample_repository: SampleRepository,
    #[case] path: &str,
) {
    let reply = get(test_app(&sample_repository, None), "main.example.org", path).await;

    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert!(reply.text().starts_with("File not found: "), "{}", reply.text());
}

#[rstest]
#[tokio::test]
async fn encoded_slash_in_directory_path_is_not_found(sample_repository: SampleRepository) {
    let reply = get(test_app(&sample_repository, None), "main.example.org", "/assets%2F/").await;

    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert!(reply.text().starts_with("Directory not found: "), "{}", reply.text());
}

#[rstest]
#[tokio::test]
async fn packed_branch_serves_its_tip(packed_repository: SampleRepository) {
    let reply = get(test_app(&packed_repository, None), "main.example.org", "/README.md").await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.text(), common::README_V2);
    assert_eq!(reply.content_type.as_deref(), Some("text/markdown"));
}

#[rstest]
#[tokio::test]
async fn packed_branch_lists_its_root(packed_repository: SampleRepository) {
    let reply = get(test_app(&packed_repository, None), "main.example.org", "/").await;

    assert_eq!(reply.status, StatusCode::OK);
    let body = reply.text();
    assert!(body.contains(r#"href="README.md">README.md</a>"#), "{body}");
    assert!(body.contains(">docs/</a>"), "{body}");
    assert!(body.contains(">vendor/</a>"), "{body}");
}

#[rstest]
#[tokio::test]
async fn packed_annotated_tag_serves_tagged_file(packed_repository: SampleRepository) {
    let app = test_app(&packed_repository, Some("example.org"));

    let reply = get(app, "v1.0.0.example.org", "/README.md").await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.text(), common::README_V1);
}

#[rstest]
#[tokio::test]
async fn packed_commit_hash_host_serves_that_commit(packed_repository: SampleRepository) {
    let host = format!("{}.example.org", packed_repository.first_commit);

    let reply = get(test_app(&packed_repository, None), &host, "/assets/app.js").await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.text(), common::APP_JS);
}

#[rstest]
#[tokio::test]
async fn packed_tag_on_a_tree_is_commit_not_found(packed_repository: SampleRepository) {
    let reply = get(test_app(&packed_repository, None), "treetag.example.org", "/").await;

    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert!(reply.text().starts_with("Commit not found: Tag treetag"), "{}", reply.text());
}

#[rstest]
#[tokio::test]
async fn template_failure_is_reported_inline(sample_repository: SampleRepository) {
    let broken = ListingTemplate::from_source("broken.html".into(), "{{ missing.attr }}".into())
        .expect("template should compile");
    let app = test_app_with_template(&sample_repository, None, broken);

    let reply = get(app, "main.example.org", "/").await;

    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.content_type.as_ref().unwrap().starts_with("text/html"));
    assert!(reply.text().contains("error executing template"), "{}", reply.text());
}

#[rstest]
#[tokio::test]
async fn every_method_is_served(sample_repository: SampleRepository) {
    let reply = send(
        test_app(&sample_repository, None),
        Method::POST,
        "main.example.org",
        "/README.md",
    )
    .await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.text(), common::README_V2);
}

#[rstest]
#[tokio::test]
async fn responses_never_use_server_error_statuses(sample_repository: SampleRepository) {
    let cases = [
        ("main.example.org", "/"),
        ("main.example.org", "/nope"),
        ("nope.example.org", "/nope/"),
        ("treetag.example.org", "/README.md"),
        ("single", "/"),
        ("main.example.org", "/binary.bin"),
    ];

    for (host, path) in cases {
        let reply = get(test_app(&sample_repository, None), host, path).await;
        assert!(
            reply.status == StatusCode::OK || reply.status == StatusCode::NOT_FOUND,
            "{host}{path} -> {}",
            reply.status
        );
    }
}

#[rstest]
#[tokio::test]
async fn identical_requests_get_identical_responses(sample_repository: SampleRepository) {
    let app = test_app(&sample_repository, None);

    let first = get(app.clone(), "main.example.org", "/").await;
    let second = get(app, "main.example.org", "/").await;

    assert_eq!(first.status, second.status);
    assert_eq!(first.body, second.body);
}
