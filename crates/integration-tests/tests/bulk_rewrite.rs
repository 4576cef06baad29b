//! Batch rewrites against mocked Admin and chat APIs.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use homare_admin::rewrite::{Breadcrumbs, DISCLAIMER_HTML, RewriteRequest, Rewriter, Stage};
use homare_core::{ProductGid, RewriteTemplate};
use homare_integration_tests::{
    CHAT_PATH, TestContext, generated, gid, metafields_set_ok, metafields_set_rejected, product,
    product_update_ok, product_update_rejected,
};

fn ids(ids: &[u64]) -> Vec<ProductGid> {
    ids.iter()
        .map(|id| ProductGid::parse(&gid(*id)).unwrap())
        .collect()
}

fn metafield_keys(request: &Value) -> Vec<String> {
    request["variables"]["metafields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| format!("{}.{}", m["namespace"].as_str().unwrap(), m["key"].as_str().unwrap()))
        .collect()
}

#[tokio::test]
async fn test_widget_end_to_end() {
    let ctx = TestContext::start().await;
    ctx.mock_graphql(
        "GetProduct",
        None,
        product(7, "Widget X", "<p>A widget</p>"),
    )
    .await;
    ctx.mock_graphql("ProductUpdate", None, product_update_ok(7, "ウィジェットX"))
        .await;
    ctx.mock_graphql("MetafieldsSet", None, metafields_set_ok())
        .await;
    ctx.mock_chat(&generated("ウィジェットX", "")).await;

    let report = Rewriter::new(ctx.state.shopify(), ctx.state.openai())
        .run_batch(RewriteRequest {
            ids: ids(&[7]),
            template: RewriteTemplate::Alibaba,
            breadcrumbs: Breadcrumbs {
                cat_big: Some("インテリア".to_string()),
                cat_mid: None,
            },
        })
        .await;

    assert_eq!(report.requested, 1);
    assert_eq!(report.succeeded, 1);
    assert!(report.failures.is_empty());

    let prompt = ctx.openai.received_requests().await.unwrap();
    let prompt: Value = serde_json::from_slice(&prompt[0].body).unwrap();
    let text = prompt["messages"][0]["content"].as_str().unwrap();
    assert!(text.contains("Widget X"));
    assert!(text.contains("<p>A widget</p>"));

    let update = &ctx.operation_requests("ProductUpdate").await[0];
    let input = &update["variables"]["product"];
    assert_eq!(input["id"], gid(7));
    assert_eq!(input["title"], "ウィジェットX");
    assert_eq!(input["templateSuffix"], "alibaba");
    assert_eq!(input["seo"]["title"], "ウィジェットX｜誉PRINTING");
    assert!(
        input["descriptionHtml"]
            .as_str()
            .unwrap()
            .ends_with("</ul>")
    );

    let metafields = &ctx.operation_requests("MetafieldsSet").await[0];
    assert_eq!(
        metafield_keys(metafields),
        [
            "spec.details01",
            "spec.details02",
            "spec.details03",
            "dropshipping.aliexpress",
            "breadcrumbs.cat_big",
        ]
    );
    assert_eq!(metafields["variables"]["metafields"][0]["ownerId"], gid(7));
    assert_eq!(metafields["variables"]["metafields"][3]["value"], "海外発送");
    assert_eq!(metafields["variables"]["metafields"][4]["value"], "インテリア");
}

#[tokio::test]
async fn test_single_spec_widget_gets_disclaimer_and_two_metafields() {
    let ctx = TestContext::start().await;
    ctx.mock_graphql("GetProduct", None, product(8, "Widget X", "<p>old</p>"))
        .await;
    ctx.mock_graphql("ProductUpdate", None, product_update_ok(8, "新ウィジェット"))
        .await;
    ctx.mock_graphql("MetafieldsSet", None, metafields_set_ok())
        .await;
    let output = json!({
        "title": "新ウィジェット",
        "bodyHtml": "<p>新しい</p>",
        "seoTitle": "新ウィジェット｜誉PRINTING",
        "seoDescription": "...",
        "specs": {"details1": "10cm", "details2": "", "details3": "", "details4": ""}
    });
    ctx.mock_chat(&output.to_string()).await;

    let report = Rewriter::new(ctx.state.shopify(), ctx.state.openai())
        .run_batch(RewriteRequest {
            ids: ids(&[8]),
            template: RewriteTemplate::Aliexpress,
            breadcrumbs: Breadcrumbs::default(),
        })
        .await;
    assert_eq!(report.succeeded, 1);

    let update = &ctx.operation_requests("ProductUpdate").await[0];
    let input = &update["variables"]["product"];
    assert_eq!(input["title"], "新ウィジェット");
    assert_eq!(
        input["descriptionHtml"],
        format!("<p>新しい</p>{DISCLAIMER_HTML}")
    );
    assert!(
        input["descriptionHtml"]
            .as_str()
            .unwrap()
            .ends_with(DISCLAIMER_HTML)
    );

    let metafields = &ctx.operation_requests("MetafieldsSet").await[0];
    assert_eq!(
        metafield_keys(metafields),
        ["spec.details01", "dropshipping.aliexpress"]
    );
    assert_eq!(metafields["variables"]["metafields"][0]["value"], "10cm");
}

#[tokio::test]
async fn test_rejected_metafields_leave_product_update_in_place() {
    let ctx = TestContext::start().await;
    ctx.mock_graphql("GetProduct", None, product(6, "Six", "")).await;
    ctx.mock_graphql("ProductUpdate", None, product_update_ok(6, "Six"))
        .await;
    ctx.mock_graphql(
        "MetafieldsSet",
        None,
        metafields_set_rejected("Value is invalid"),
    )
    .await;
    ctx.mock_chat(&generated("シックス", "")).await;

    let report = Rewriter::new(ctx.state.shopify(), ctx.state.openai())
        .run_batch(RewriteRequest {
            ids: ids(&[6]),
            template: RewriteTemplate::Aliexpress,
            breadcrumbs: Breadcrumbs::default(),
        })
        .await;

    assert_eq!(report.succeeded, 0);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].stage, Stage::MetafieldsSet);
    assert!(report.failures[0].error.contains("Value is invalid"));
    assert_eq!(ctx.operation_requests("ProductUpdate").await.len(), 1);
    assert_eq!(ctx.operation_requests("MetafieldsSet").await.len(), 1);
}

#[tokio::test]
async fn test_details04_written_when_present() {
    let ctx = TestContext::start().await;
    ctx.mock_graphql("GetProduct", None, product(1, "Lamp", "")).await;
    ctx.mock_graphql("ProductUpdate", None, product_update_ok(1, "Lamp"))
        .await;
    ctx.mock_graphql("MetafieldsSet", None, metafields_set_ok())
        .await;
    ctx.mock_chat(&generated("ランプ", "100V")).await;

    let report = Rewriter::new(ctx.state.shopify(), ctx.state.openai())
        .run_batch(RewriteRequest {
            ids: ids(&[1]),
            template: RewriteTemplate::Aliexpress,
            breadcrumbs: Breadcrumbs::default(),
        })
        .await;
    assert_eq!(report.succeeded, 1);

    let metafields = &ctx.operation_requests("MetafieldsSet").await[0];
    let keys = metafield_keys(metafields);
    assert!(keys.contains(&"spec.details04".to_string()));
    assert!(!keys.iter().any(|k| k.starts_with("breadcrumbs.")));
}

#[tokio::test]
async fn test_failures_do_not_stop_the_batch() {
    let ctx = TestContext::start().await;
    // Product 2 is missing, product 3 gets unparseable output.
    ctx.mock_graphql("GetProduct", Some(json!({ "id": gid(1) })), product(1, "One", ""))
        .await;
    ctx.mock_graphql("GetProduct", Some(json!({ "id": gid(2) })), json!({ "product": null }))
        .await;
    ctx.mock_graphql("GetProduct", Some(json!({ "id": gid(3) })), product(3, "Three", ""))
        .await;
    ctx.mock_graphql("ProductUpdate", None, product_update_ok(1, "One"))
        .await;
    ctx.mock_graphql("MetafieldsSet", None, metafields_set_ok())
        .await;

    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(homare_integration_tests::chat_response(&generated("One", ""))),
        )
        .up_to_n_times(1)
        .mount(&ctx.openai)
        .await;
    ctx.mock_chat("I cannot help with that.").await;

    let report = Rewriter::new(ctx.state.shopify(), ctx.state.openai())
        .run_batch(RewriteRequest {
            ids: ids(&[1, 2, 3]),
            template: RewriteTemplate::Aliexpress,
            breadcrumbs: Breadcrumbs::default(),
        })
        .await;

    assert_eq!(report.requested, 3);
    assert_eq!(report.succeeded, 1);
    assert_eq!(report.failures.len(), 2);
    assert_eq!(report.failures[0].product_id.as_str(), gid(2));
    assert_eq!(report.failures[0].stage, Stage::Fetch);
    assert_eq!(report.failures[1].product_id.as_str(), gid(3));
    assert_eq!(report.failures[1].stage, Stage::Parse);

    assert_eq!(ctx.operation_requests("ProductUpdate").await.len(), 1);
}

#[tokio::test]
async fn test_user_errors_abort_before_metafields() {
    let ctx = TestContext::start().await;
    ctx.mock_graphql("GetProduct", None, product(5, "Five", "")).await;
    ctx.mock_graphql("ProductUpdate", None, product_update_rejected("Title is too long"))
        .await;
    ctx.mock_graphql("MetafieldsSet", None, metafields_set_ok())
        .await;
    ctx.mock_chat(&generated("Five", "")).await;

    let report = Rewriter::new(ctx.state.shopify(), ctx.state.openai())
        .run_batch(RewriteRequest {
            ids: ids(&[5]),
            template: RewriteTemplate::Aliexpress,
            breadcrumbs: Breadcrumbs::default(),
        })
        .await;

    assert_eq!(report.succeeded, 0);
    assert_eq!(report.failures[0].stage, Stage::ProductUpdate);
    assert!(report.failures[0].error.contains("Title is too long"));
    assert!(ctx.operation_requests("MetafieldsSet").await.is_empty());
}

#[tokio::test]
async fn test_chat_api_error_is_a_generate_failure() {
    let ctx = TestContext::start().await;
    ctx.mock_graphql("GetProduct", None, product(9, "Nine", "")).await;
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": { "type": "server_error", "message": "overloaded" }
        })))
        .mount(&ctx.openai)
        .await;

    let report = Rewriter::new(ctx.state.shopify(), ctx.state.openai())
        .run_batch(RewriteRequest {
            ids: ids(&[9]),
            template: RewriteTemplate::Aliexpress,
            breadcrumbs: Breadcrumbs::default(),
        })
        .await;

    assert_eq!(report.failures[0].stage, Stage::Generate);
    assert!(ctx.operation_requests("ProductUpdate").await.is_empty());
}
