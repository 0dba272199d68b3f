//! Assembly of encoded pages into one scrollable HTML document.
//!
//! Page numbers are not stored on the cards. The embedded script numbers the
//! images in document order once the display surface has loaded the page.

use std::fmt;

use crate::pdf::EncodedImage;

const STYLE: &str = "\
.card {
  border-radius: 8px;
  box-shadow: 0 4px 8px rgba(0, 0, 0, 0.2);
  margin: 8px;
  position: relative;
}
.page-number {
  position: absolute;
  top: 0;
  right: 0;
  background-color: rgba(0, 0, 0, 0.5);
  color: white;
  padding: 2px 6px;
  border-top-left-radius: 4px;
}
";

const SCRIPT: &str = "\
function addPageNumbers() {
  var imgs = document.getElementsByTagName('img');
  for (var i = 0; i < imgs.length; i++) {
    var label = document.createElement('div');
    label.className = 'page-number';
    label.textContent = 'Page ' + (i + 1);
    imgs[i].parentNode.appendChild(label);
  }
}
";

const BODY_OPEN: &str = "<body onload=\"addPageNumbers()\">";
const IMG_OPEN: &str = "<img ";

/// The assembled markup. Write-once; hand it to a display surface as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeDocument {
    html: String,
    card_count: usize,
}

impl CompositeDocument {
    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn into_html(self) -> String {
        self.html
    }

    pub fn card_count(&self) -> usize {
        self.card_count
    }

    /// Labels the on-load script will attach, derived from image order in the body.
    pub fn page_labels(&self) -> Vec<String> {
        let body = self
            .html
            .find(BODY_OPEN)
            .map_or("", |start| &self.html[start..]);
        body.match_indices(IMG_OPEN)
            .enumerate()
            .map(|(i, _)| format!("Page {}", i + 1))
            .collect()
    }
}

impl fmt::Display for CompositeDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.html)
    }
}

/// Build the composite document, one card per image, in iteration order.
pub fn assemble<I>(images: I) -> CompositeDocument
where
    I: IntoIterator<Item = EncodedImage>,
{
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\">\n<style>\n");
    html.push_str(STYLE);
    html.push_str("</style>\n<script>\n");
    html.push_str(SCRIPT);
    html.push_str("</script>\n</head>");
    html.push_str(BODY_OPEN);
    html.push('\n');

    let mut card_count = 0;
    for image in images {
        html.push_str("<div class=\"card\">");
        html.push_str(IMG_OPEN);
        html.push_str("style=\"width: 100%; height: auto;\" src=\"");
        html.push_str(&image.data_uri());
        html.push_str("\"/></div>\n");
        card_count += 1;
    }

    html.push_str("</body></html>\n");
    CompositeDocument { html, card_count }
}
