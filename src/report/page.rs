//! Named content containers for a rendered report, plus standalone export.

use super::html::escape;
use crate::error::Error;

const REPORT_STYLE: &str = r#".tree-structure { font-family: sans-serif; }
.tree-node { padding: 4px 0; }
.tree-toggle { cursor: pointer; display: inline-block; width: 16px; }
.field-node { margin-left: 0; }
.unit-node { margin-left: 20px; }
.tree-children { margin-left: 0; }
.stat-card { display: inline-block; min-width: 120px; margin: 8px; padding: 12px; border-radius: 8px; background: #f5f7fa; text-align: center; }
.stat-card .number { font-size: 24px; font-weight: bold; color: #2c7be5; }
.stat-card .label { color: #666; }"#;

const TOGGLE_SCRIPT: &str = r#"document.addEventListener('click', function (event) {
  var toggle = event.target.closest('.tree-toggle');
  if (!toggle) return;
  var children = toggle.parentElement.nextElementSibling;
  if (children && children.classList.contains('tree-children')) {
    var hidden = children.style.display === 'none';
    children.style.display = hidden ? 'block' : 'none';
    toggle.textContent = hidden ? '▼' : '▶';
  }
});"#;

#[derive(Debug, Clone)]
struct Container {
    id: String,
    html: String,
}

#[derive(Debug, Clone, Default)]
pub struct ReportPage {
    containers: Vec<Container>,
}

impl ReportPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_containers<'a>(ids: impl IntoIterator<Item = &'a str>) -> Self {
        let mut page = Self::new();
        for id in ids {
            page.add_container(id);
        }
        page
    }

    /// Registers an empty container. Registering an existing id is a no-op.
    pub fn add_container(&mut self, id: &str) {
        if self.find(id).is_none() {
            self.containers.push(Container {
                id: id.to_string(),
                html: String::new(),
            });
        }
    }

    pub fn inner_html(&self, id: &str) -> Option<&str> {
        self.find(id).map(|c| self.containers[c].html.as_str())
    }

    pub fn set_inner_html(&mut self, id: &str, html: String) -> Result<(), Error> {
        let idx = self
            .find(id)
            .ok_or_else(|| Error::ContainerNotFound(id.to_string()))?;
        self.containers[idx].html = html;
        Ok(())
    }

    fn find(&self, id: &str) -> Option<usize> {
        self.containers.iter().position(|c| c.id == id)
    }

    /// A self-contained HTML document with every container in registration order.
    pub fn to_document(&self, title: &str) -> String {
        let mut doc = String::from("<!DOCTYPE html>\n<html lang=\"zh-CN\">\n<head>\n<meta charset=\"utf-8\">\n");
        doc.push_str(&format!("<title>{}</title>\n", escape(title)));
        doc.push_str(&format!("<style>\n{}\n</style>\n</head>\n<body>\n", REPORT_STYLE));
        for container in &self.containers {
            doc.push_str(&format!(
                "<div id=\"{}\">{}</div>\n",
                escape(&container.id),
                container.html
            ));
        }
        doc.push_str(&format!("<script>\n{}\n</script>\n</body>\n</html>\n", TOGGLE_SCRIPT));
        doc
    }
}
