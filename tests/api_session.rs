#[cfg(test)]
mod tests {
    use mockito::{Matcher, Server, ServerGuard};
    use planty::api::transport::{SessionStore, SESSION_COOKIE};
    use planty::api::{ApiError, HttpTransport, PlantyApi, Store};
    use planty::libs::data_storage::DataStorage;
    use planty::libs::form::TaskCreate;
    use planty::libs::hierarchy::SectionsQuery;
    use serde_json::json;
    use tempfile::TempDir;
    use test_context::{test_context, AsyncTestContext};
    use uuid::Uuid;

    struct ApiTestContext {
        _temp_dir: TempDir,
        server: ServerGuard,
        storage: DataStorage,
    }

    impl AsyncTestContext for ApiTestContext {
        async fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let storage = DataStorage::with_base_path(temp_dir.path());
            ApiTestContext {
                _temp_dir: temp_dir,
                server: Server::new_async().await,
                storage,
            }
        }
    }

    impl ApiTestContext {
        fn store(&self) -> Store {
            Store::new(PlantyApi::new(HttpTransport::new(&self.server.url(), &self.storage)))
        }
    }

    fn user_json() -> serde_json::Value {
        json!({
            "id": Uuid::from_u128(1),
            "email": "ann@example.com",
            "is_active": true,
            "is_superuser": false,
            "is_verified": true
        })
    }

    #[test_context(ApiTestContext)]
    #[tokio::test]
    async fn test_login_keeps_the_session_cookie(ctx: &mut ApiTestContext) {
        let login = ctx
            .server
            .mock("POST", "/api/auth/login")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("username".into(), "ann@example.com".into()),
                Matcher::UrlEncoded("password".into(), "secret".into()),
            ]))
            .with_status(204)
            .with_header("set-cookie", &format!("{}=tok123; HttpOnly; Max-Age=3600; Path=/", SESSION_COOKIE))
            .create_async()
            .await;
        let me = ctx
            .server
            .mock("GET", "/api/auth/me")
            .match_header("cookie", format!("{}=tok123", SESSION_COOKIE).as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(user_json().to_string())
            .create_async()
            .await;

        let store = ctx.store();
        store.login("ann@example.com", "secret").await.unwrap();
        assert_eq!(SessionStore::new(&ctx.storage).read().as_deref(), Some("tok123"));

        let user = store.me().await.unwrap().unwrap();
        assert_eq!(user.email, "ann@example.com");

        login.assert_async().await;
        me.assert_async().await;
    }

    #[test_context(ApiTestContext)]
    #[tokio::test]
    async fn test_me_without_session_is_none(ctx: &mut ApiTestContext) {
        ctx.server
            .mock("GET", "/api/auth/me")
            .with_status(401)
            .with_body(r#"{"detail": "Unauthorized"}"#)
            .create_async()
            .await;

        assert_eq!(ctx.store().me().await.unwrap(), None);
    }

    #[test_context(ApiTestContext)]
    #[tokio::test]
    async fn test_logout_clears_the_session(ctx: &mut ApiTestContext) {
        SessionStore::new(&ctx.storage).write("tok123");
        ctx.server
            .mock("POST", "/api/auth/logout")
            .with_status(204)
            .with_header("set-cookie", &format!("{}=\"\"; HttpOnly; Max-Age=0; Path=/", SESSION_COOKIE))
            .create_async()
            .await;

        ctx.store().logout().await.unwrap();
        assert_eq!(SessionStore::new(&ctx.storage).read(), None);
    }

    #[test_context(ApiTestContext)]
    #[tokio::test]
    async fn test_validation_error_carries_the_detail(ctx: &mut ApiTestContext) {
        ctx.server
            .mock("POST", "/api/task")
            .with_status(422)
            .with_body(
                json!({"detail": [{"loc": ["body", "title"], "msg": "field required", "type": "value_error.missing"}]})
                    .to_string(),
            )
            .create_async()
            .await;

        let payload = TaskCreate {
            section_id: Uuid::from_u128(5),
            title: "Water the plants".to_string(),
            description: None,
            due_to: None,
            recurrence: None,
        };
        match ctx.store().create_task(&payload).await {
            Err(ApiError::Validation(detail)) => assert_eq!(detail, "field required"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test_context(ApiTestContext)]
    #[tokio::test]
    async fn test_sections_query_sends_both_flags(ctx: &mut ApiTestContext) {
        let root = Uuid::from_u128(10);
        let mock = ctx
            .server
            .mock("GET", "/api/sections")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("leaves_only".into(), "false".into()),
                Matcher::UrlEncoded("as_tree".into(), "true".into()),
            ]))
            .with_status(200)
            .with_body(
                json!([{
                    "id": root,
                    "title": "root",
                    "parent_id": null,
                    "added_at": "2025-01-01T00:00:00",
                    "subsections": [{
                        "id": Uuid::from_u128(11),
                        "title": "Home",
                        "parent_id": root,
                        "added_at": "2025-01-01T00:00:00",
                        "subsections": [],
                        "tasks": []
                    }],
                    "tasks": []
                }])
                .to_string(),
            )
            .create_async()
            .await;

        let tree = ctx.store().section_tree(SectionsQuery::tree()).await.unwrap();
        assert_eq!(tree.root_id().unwrap(), root);
        assert_eq!(tree.sections.len(), 1);
        assert_eq!(tree.sections[0].title, "Home");
        mock.assert_async().await;
    }
}
