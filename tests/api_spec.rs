mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use rulekit::api::create_router;
use rulekit::models::ResolvedScopes;
use tempfile::TempDir;

fn setup() -> (TestServer, TempDir) {
    let (dir, store) = common::fixture_store();
    let app = create_router(store);
    let server = TestServer::new(app).expect("Failed to create test server");
    (server, dir)
}

mod health {
    use super::*;

    #[tokio::test]
    async fn returns_ok() {
        let (server, _dir) = setup();

        let response = server.get("/api/v1/health").await;

        response.assert_status_ok();
        response.assert_json(&serde_json::json!({ "status": "ok" }));
    }
}

mod scopes {
    use super::*;

    #[tokio::test]
    async fn lists_sorted_keys_for_scope() {
        let (server, _dir) = setup();

        let response = server.get("/api/v1/scopes/tech").await;

        response.assert_status_ok();
        let keys: Vec<String> = response.json();
        assert_eq!(keys, vec!["nextjs", "node", "react"]);
    }

    #[tokio::test]
    async fn rejects_unknown_scope() {
        let (server, _dir) = setup();

        let response = server.get("/api/v1/scopes/module").await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn resolves_project_with_nested_key() {
        let (server, _dir) = setup();

        let response = server
            .get("/api/v1/resolve/project/buerokratt/Service-Module")
            .await;

        response.assert_status_ok();
        let scopes: ResolvedScopes = response.json();
        assert!(scopes.projects.contains("buerokratt/Service-Module"));
        assert!(scopes.techs.contains("react"));
        assert!(scopes.languages.contains("typescript"));
    }
}

mod rules {
    use super::*;

    #[tokio::test]
    async fn returns_merged_markdown() {
        let (server, _dir) = setup();

        let response = server
            .get("/api/v1/rules/project/buerokratt/Service-Module")
            .await;

        response.assert_status_ok();
        let text = response.text();
        assert!(text.starts_with("# Rules (project:buerokratt/Service-Module)\n\n# General"));
        assert_eq!(text.matches("\n\n---\n\n").count(), 3);
        assert!(response
            .header("content-type")
            .to_str()
            .expect("Header is ASCII")
            .starts_with("text/markdown"));
    }

    #[tokio::test]
    async fn returns_placeholder_for_unmatched_key() {
        let (server, dir) = setup();
        common::write_file(dir.path(), "manifest.yml", "{}\n");

        let response = server.get("/api/v1/rules/language/cobol").await;

        response.assert_status_ok();
        response.assert_text("# Rules (language:cobol)\n\n_No rules found._");
    }

    #[tokio::test]
    async fn hides_load_errors_from_client() {
        let (server, dir) = setup();
        common::write_file(dir.path(), "broken.md", "---\ndescription: no scopes\n---\nBody\n");

        let response = server.get("/api/v1/rules/group/global").await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        response.assert_text("Internal server error");
    }
}

mod search {
    use super::*;

    #[tokio::test]
    async fn searches_all_rules() {
        let (server, _dir) = setup();

        let response = server
            .get("/api/v1/search")
            .add_query_param("keyword", "hooks")
            .await;

        response.assert_status_ok();
        assert!(response.text().starts_with("Found 1 rule(s) containing \"hooks\""));
    }

    #[tokio::test]
    async fn searches_within_scope() {
        let (server, _dir) = setup();

        let response = server
            .get("/api/v1/search")
            .add_query_param("keyword", "log")
            .add_query_param("scope", "tech")
            .add_query_param("key", "react")
            .await;

        response.assert_status_ok();
        response.assert_text("No rules found containing \"log\" in tech \"react\".");
    }

    #[tokio::test]
    async fn rejects_half_specified_scope() {
        let (server, _dir) = setup();

        let response = server
            .get("/api/v1/search")
            .add_query_param("keyword", "hooks")
            .add_query_param("key", "react")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_text("Both scope and key must be provided together.");
    }
}
