//! Form and response page rendering.
//!
//! [`FormRenderer`] is the seam for a real template set. [`BasicFormRenderer`]
//! produces plain HTML whose form posts values to `/submit` and `/cancel`.
//! File inputs are not part of that post: a small inline script sends each
//! selection to `/upload` as `{label}__index__{n}` parts and wires every
//! `data-reset-url` button to `POST /upload/reset/{label}`.

use std::fmt::Write as _;

use portal_types::field::{Field, FieldSchema, FieldType};

/// Everything the landing page shows.
#[derive(Debug, Clone, Copy)]
pub struct FormView<'a> {
    pub schema: &'a FieldSchema,
    pub title: Option<&'a str>,
    /// Session timeout as `m:ss`.
    pub timeout: &'a str,
    /// Repository owner shown in the page header.
    pub display_context: &'a str,
}

pub trait FormRenderer: Send + Sync {
    fn render_form(&self, view: &FormView<'_>) -> String;

    /// Page returned after a successful submit.
    fn render_submitted(&self, run_url: &str) -> String;

    /// Page returned after a cancel.
    fn render_cancelled(&self, run_url: &str) -> String;
}

/// `125` -> `"2:05"`.
pub fn format_timeout(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Client side of the upload and reset endpoints.
const UPLOAD_SCRIPT: &str = r#"<script>
document.querySelectorAll("input[data-upload-label]").forEach((input) => {
  input.addEventListener("change", async () => {
    const label = input.dataset.uploadLabel;
    const body = new FormData();
    Array.from(input.files).forEach((file, i) => body.append(`${label}__index__${i}`, file, file.name));
    await fetch("/upload", { method: "POST", body });
  });
});
document.querySelectorAll("button[data-reset-url]").forEach((button) => {
  button.addEventListener("click", async () => {
    await fetch(button.dataset.resetUrl, { method: "POST" });
    const input = document.getElementById(button.dataset.uploadLabel);
    if (input) input.value = "";
  });
});
</script>
"#;

#[derive(Debug, Clone, Copy, Default)]
pub struct BasicFormRenderer;

impl BasicFormRenderer {
    fn render_field(out: &mut String, field: &Field) {
        let props = &field.properties;
        let label = escape(&field.label);
        let required = if props.required { " required" } else { "" };
        let readonly = if props.read_only { " readonly" } else { "" };
        let default = escape(props.default_value.as_deref().unwrap_or_default());
        let placeholder = escape(&props.placeholder);

        let _ = writeln!(out, "<div class=\"field\" data-type=\"{}\">", field.field_type());
        let _ = writeln!(out, "<label for=\"{label}\">{}</label>", escape(field.display_name()));
        if !props.description.is_empty() {
            let _ = writeln!(out, "<p class=\"description\">{}</p>", escape(&props.description));
        }

        match field.field_type() {
            FieldType::Text => {
                let max = props
                    .max_length
                    .map(|m| format!(" maxlength=\"{m}\""))
                    .unwrap_or_default();
                let _ = writeln!(
                    out,
                    "<input type=\"text\" id=\"{label}\" name=\"{label}\" value=\"{default}\" placeholder=\"{placeholder}\"{max}{required}{readonly}>"
                );
            }
            FieldType::Textarea => {
                let _ = writeln!(
                    out,
                    "<textarea id=\"{label}\" name=\"{label}\" placeholder=\"{placeholder}\"{required}{readonly}>{default}</textarea>"
                );
            }
            FieldType::Number => {
                let min = props.min_number.map(|m| format!(" min=\"{m}\"")).unwrap_or_default();
                let max = props.max_number.map(|m| format!(" max=\"{m}\"")).unwrap_or_default();
                let _ = writeln!(
                    out,
                    "<input type=\"number\" id=\"{label}\" name=\"{label}\" value=\"{default}\"{min}{max}{required}{readonly}>"
                );
            }
            FieldType::Boolean => {
                let checked = match props.default_value.as_deref() {
                    Some("true") => " checked",
                    _ => "",
                };
                let _ = writeln!(
                    out,
                    "<input type=\"checkbox\" id=\"{label}\" name=\"{label}\" value=\"true\"{checked}>"
                );
            }
            FieldType::Select | FieldType::Multiselect => {
                let multiple = if field.field_type() == FieldType::Multiselect {
                    " multiple"
                } else {
                    ""
                };
                let _ = writeln!(out, "<select id=\"{label}\" name=\"{label}\"{multiple}{required}>");
                for choice in &props.choices {
                    let selected = if props.default_value.as_deref() == Some(choice.as_str()) {
                        " selected"
                    } else {
                        ""
                    };
                    let choice = escape(choice);
                    let _ = writeln!(out, "<option value=\"{choice}\"{selected}>{choice}</option>");
                }
                let _ = writeln!(out, "</select>");
            }
            FieldType::File | FieldType::Multifile => {
                let multiple = if field.field_type() == FieldType::Multifile {
                    " multiple"
                } else {
                    ""
                };
                let accept = if props.accepted_file_types.is_empty() {
                    String::new()
                } else {
                    format!(" accept=\"{}\"", escape(&props.accepted_file_types.join(",")))
                };
                let _ = writeln!(
                    out,
                    "<input type=\"file\" id=\"{label}\" data-upload-label=\"{label}\"{accept}{multiple}>\n<input type=\"hidden\" name=\"{label}\" value=\"uploaded\">\n<button type=\"button\" data-upload-label=\"{label}\" data-reset-url=\"/upload/reset/{label}\">Reset</button>"
                );
            }
        }

        let _ = writeln!(out, "</div>");
    }

    fn page(title: &str, body: &str) -> String {
        format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<link rel=\"stylesheet\" href=\"/static/css/portal.css\">\n</head>\n<body>\n{body}</body>\n</html>\n",
            escape(title)
        )
    }
}

impl FormRenderer for BasicFormRenderer {
    fn render_form(&self, view: &FormView<'_>) -> String {
        let heading = view.title.unwrap_or("Interactive Inputs");
        let mut body = String::new();
        let _ = writeln!(body, "<header><span class=\"owner\">{}</span>", escape(view.display_context));
        let _ = writeln!(body, "<h1>{}</h1>", escape(heading));
        let _ = writeln!(
            body,
            "<p class=\"timeout\">This portal expires in <span id=\"timeout\">{}</span></p></header>",
            escape(view.timeout)
        );
        let _ = writeln!(body, "<form method=\"post\" action=\"/submit\">");
        for field in view.schema.iter() {
            Self::render_field(&mut body, field);
        }
        let _ = writeln!(
            body,
            "<button type=\"submit\">Submit</button>\n<button type=\"submit\" formaction=\"/cancel\" formnovalidate>Cancel</button>\n</form>"
        );
        if view.schema.file_fields().next().is_some() {
            body.push_str(UPLOAD_SCRIPT);
        }
        Self::page(heading, &body)
    }

    fn render_submitted(&self, run_url: &str) -> String {
        Self::page(
            "Inputs received",
            &format!(
                "<h1>Your inputs have successfully been received!</h1>\n<p><a href=\"{}\">Return to the run</a></p>\n",
                escape(run_url)
            ),
        )
    }

    fn render_cancelled(&self, run_url: &str) -> String {
        Self::page(
            "Run cancelled",
            &format!(
                "<h1>The run has been cancelled.</h1>\n<p><a href=\"{}\">Return to the run</a></p>\n",
                escape(run_url)
            ),
        )
    }
}
