use serde_json::json;

const SCALAR_CDN: &str = "https://cdn.jsdelivr.net/npm/@scalar/api-reference";

/// HTML page embedding the Scalar API reference.
pub fn scalar_page(openapi_url: &str, token: &str) -> String {
    let options = json!({
        "url": openapi_url,
        "authentication": {
            "securitySchemes": {
                "bearerAuth": { "token": token }
            }
        }
    });
    // Keep the inline script from being closed by data.
    let options = options.to_string().replace("</", "<\\/");

    format!(
        r#"<!doctype html>
<html>
  <head>
    <title>API Documentation</title>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
  </head>
  <body>
    <div id="app"></div>

    <script src="{SCALAR_CDN}"></script>
    <script>
      Scalar.createApiReference('#app', {options})
    </script>
  </body>
</html>
"#
    )
}
