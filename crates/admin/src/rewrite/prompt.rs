//! Prompt construction for product rewrites.

use homare_core::RewriteTemplate;

/// Output contract shown to the model. Key names must match
/// [`GeneratedContent`](super::GeneratedContent).
const OUTPUT_SCHEMA: &str = r#"{
  "title": "40字以内の日本語タイトル",
  "bodyHtml": "<p>特徴要約</p><p><strong>【ポイント】</strong></p><ul><li>特徴1</li><li>特徴2</li><li>特徴3</li></ul><p><strong>【注意事項】</strong></p><ul><li><strong>写真と実物の色合いが若干異なる場合があります。</strong></li><li><strong>手作業による測定のためサイズに多少の誤差がある場合がございます。予めご了承ください。</strong></li></ul>",
  "seoTitle": "末尾に『｜誉PRINTING』をつけたタイトル",
  "seoDescription": "120〜240字の自然な日本語で要約",
  "specs": {
    "details1": "サイズに関する仕様",
    "details2": "素材・材質に関する仕様",
    "details3": "用途に関する仕様",
    "details4": "電源に関する仕様（なければ空文字）"
  }
}"#;

/// Build the rewrite prompt for one product.
///
/// The original title and description are embedded verbatim. `template` is
/// omitted from the prompt for single-item rewrites.
#[must_use]
pub fn build_prompt(
    title: &str,
    description_html: &str,
    template: Option<RewriteTemplate>,
) -> String {
    let template_line = template
        .map(|t| format!("テンプレート種別：{t}\n"))
        .unwrap_or_default();
    format!(
        "以下の商品情報をもとに、日本語の商品説明・SEO・メタフィールドをJSON形式で生成してください。\n\
         {template_line}\n【元タイトル】\n{title}\n\n【元説明HTML】\n{description_html}\n\n\
         【出力フォーマット】以下のJSON形式で返してください。\n\n{OUTPUT_SCHEMA}\n"
    )
}
