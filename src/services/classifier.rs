// src/services/classifier.rs

//! Availability classifier.
//!
//! Turns raw HTML into a [`CheckResult`]. Signals are consulted in a fixed
//! order and the first one that fires decides the verdict:
//!
//! 1. With a selector: no match is `UNKNOWN`; otherwise keywords are searched
//!    only inside the matched elements (the selector zone).
//! 2. Without a selector: keywords are searched in the whole visible text.
//!    Unavailable phrases are checked before available ones.
//! 3. Enabled purchase controls (`button`, `a`, `input`) mean `AVAILABLE`.
//! 4. Otherwise `UNKNOWN` with a sample of the page text.
//!
//! Classification never touches the network and never fails; a malformed
//! selector becomes an `UNKNOWN` verdict.

use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};
use crate::models::{CheckResult, KeywordConfig, Status, normalize_selector};
use crate::utils::{normalize_whitespace, truncate_chars};

/// Elements whose text is never rendered.
const HIDDEN_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// Elements a shopper can click to buy.
const CONTROL_SELECTOR: &str = "button, a, input";

/// Maximum characters of page text quoted in an inconclusive verdict.
const SAMPLE_CHARS: usize = 300;

/// Characters removed before keyword comparison.
const QUOTES: &[char] = &['"', '\'', '‘', '’', '“', '”'];

/// Keyword and button based availability classifier.
#[derive(Debug, Clone)]
pub struct Classifier {
    available: Vec<String>,
    unavailable: Vec<String>,
    purchase_controls: Vec<String>,
}

impl Classifier {
    /// Create a classifier from keyword lists. Phrases are normalized once here.
    pub fn new(keywords: &KeywordConfig) -> Self {
        Self {
            available: normalize_phrases(&keywords.available),
            unavailable: normalize_phrases(&keywords.unavailable),
            purchase_controls: normalize_phrases(&keywords.purchase_controls),
        }
    }

    /// Classify a page, optionally restricted to a CSS selector zone.
    ///
    /// The returned verdict has no URL; the caller knows where the HTML came from.
    pub fn classify(&self, html: &str, css: Option<&str>) -> CheckResult {
        let document = Html::parse_document(html);
        let title = page_title(&document);
        let page_text = visible_text(document.root_element());

        let verdict = match normalize_selector(css) {
            Some(selector) => self.classify_zone(&document, &selector, &page_text),
            None => self
                .match_keywords(&page_text)
                .or_else(|| self.find_purchase_control(&document))
                .unwrap_or_else(|| inconclusive(&page_text)),
        };

        verdict.with_title(title)
    }

    fn classify_zone(&self, document: &Html, css: &str, page_text: &str) -> CheckResult {
        let selector = match parse_selector(css) {
            Ok(selector) => selector,
            Err(e) => {
                log::debug!("{}", e);
                let message = match e {
                    AppError::Selector { message, .. } => message,
                    other => other.to_string(),
                };
                return CheckResult::unknown(format!("CSS selector parse error: {message}"));
            }
        };

        let zone: Vec<ElementRef> = document.select(&selector).collect();
        if zone.is_empty() {
            return CheckResult::unknown(format!("CSS selector '{css}' matched nothing."));
        }

        let zone_text = zone
            .iter()
            .map(|element| visible_text(*element))
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if let Some(mut verdict) = self.match_keywords(&zone_text) {
            verdict.reason = format!(
                "{} (inside '{}', {} node(s))",
                verdict.reason,
                css,
                zone.len()
            );
            return verdict;
        }

        self.find_purchase_control(document)
            .unwrap_or_else(|| inconclusive(page_text))
    }

    /// First unavailable phrase wins, then first available phrase.
    fn match_keywords(&self, text: &str) -> Option<CheckResult> {
        let haystack = normalize_text(text);

        let hit = |phrases: &[String]| {
            phrases
                .iter()
                .find(|kw| haystack.contains(kw.as_str()))
                .cloned()
        };

        if let Some(kw) = hit(&self.unavailable) {
            return Some(CheckResult::new(Status::OutOfStock, keyword_reason(text, &kw)));
        }
        hit(&self.available)
            .map(|kw| CheckResult::new(Status::Available, keyword_reason(text, &kw)))
    }

    /// First enabled control, in document order, whose label is a purchase phrase.
    fn find_purchase_control(&self, document: &Html) -> Option<CheckResult> {
        let selector = parse_selector(CONTROL_SELECTOR).ok()?;

        document.select(&selector).find_map(|control| {
            let label = control_label(control);
            let lowered = label.to_lowercase();
            let is_purchase = self
                .purchase_controls
                .iter()
                .any(|phrase| lowered.contains(phrase.as_str()));

            (is_purchase && !is_disabled(control)).then(|| {
                CheckResult::new(
                    Status::Available,
                    format!("Clickable purchase control detected: '{label}'"),
                )
            })
        })
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(&KeywordConfig::default())
    }
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, e))
}

/// Strip quote characters, trim and lowercase.
fn normalize_text(text: &str) -> String {
    text.replace(QUOTES, "").trim().to_lowercase()
}

fn normalize_phrases(phrases: &[String]) -> Vec<String> {
    phrases
        .iter()
        .map(|p| normalize_text(p))
        .filter(|p| !p.is_empty())
        .collect()
}

/// Whitespace-normalized text of an element, skipping non-rendered content.
fn visible_text(element: ElementRef<'_>) -> String {
    let mut parts = Vec::new();

    for node in element.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| HIDDEN_TAGS.contains(&el.name()))
        });
        if hidden {
            continue;
        }
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed);
        }
    }

    normalize_whitespace(&parts.join(" "))
}

fn page_title(document: &Html) -> Option<String> {
    let selector = parse_selector("title").ok()?;
    let title = document
        .select(&selector)
        .next()
        .map(|el| normalize_whitespace(&el.text().collect::<String>()))?;
    (!title.is_empty()).then_some(title)
}

/// Visible label of a control; inputs carry theirs in `value`.
fn control_label(control: ElementRef<'_>) -> String {
    if control.value().name() == "input" {
        normalize_whitespace(control.value().attr("value").unwrap_or(""))
    } else {
        visible_text(control)
    }
}

fn is_disabled(control: ElementRef<'_>) -> bool {
    let element = control.value();
    if element.attr("disabled").is_some() {
        return true;
    }
    if element.classes().any(|class| class == "disabled") {
        return true;
    }
    element
        .attr("aria-disabled")
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "true" | "1"))
        .unwrap_or(false)
}

/// Evidence for a keyword hit, quoting the page's own wording when it differs.
fn keyword_reason(text: &str, keyword: &str) -> String {
    match page_wording(text, keyword) {
        Some(wording) if wording != keyword => {
            format!("Matched keyword: {keyword} ('{wording}')")
        }
        _ => format!("Matched keyword: {keyword}"),
    }
}

/// Locate the span of `text` that matched a normalized keyword.
fn page_wording<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    let wanted: Vec<char> = keyword.chars().collect();

    for (start, first) in text.char_indices() {
        if QUOTES.contains(&first) {
            continue;
        }
        let mut matched = 0;
        let mut end = start;
        for (offset, c) in text[start..].char_indices() {
            if matched == wanted.len() {
                break;
            }
            if !QUOTES.contains(&c) {
                let fits = c.to_lowercase().all(|lc| {
                    let ok = wanted.get(matched) == Some(&lc);
                    if ok {
                        matched += 1;
                    }
                    ok
                });
                if !fits {
                    break;
                }
            }
            end = start + offset + c.len_utf8();
        }
        if matched == wanted.len() {
            return Some(&text[start..end]);
        }
    }
    None
}

fn inconclusive(page_text: &str) -> CheckResult {
    CheckResult::unknown(format!(
        "No conclusive signals. Sample page text: '{}'",
        truncate_chars(page_text, SAMPLE_CHARS)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(html: &str, css: Option<&str>) -> CheckResult {
        Classifier::default().classify(html, css)
    }

    #[test]
    fn test_add_to_cart_button_is_available() {
        let result = classify("<button>Add to Cart</button>", None);
        assert_eq!(result.status, Status::Available);
        assert!(result.reason.contains("Add to Cart"));
    }

    #[test]
    fn test_unavailable_keyword_wins_over_available() {
        let html = "<html><body><p>In stock soon</p><p>Currently out of stock</p></body></html>";
        let result = classify(html, None);
        assert_eq!(result.status, Status::OutOfStock);
        assert_eq!(result.reason, "Matched keyword: out of stock");
    }

    #[test]
    fn test_keyword_precedes_button_heuristic() {
        let html = r#"<div>Out of Stock</div><a href="/buy">Buy Now</a>"#;
        let result = classify(html, None);
        assert_eq!(result.status, Status::OutOfStock);
    }

    #[test]
    fn test_keywords_ignore_case_and_quotes() {
        let result = classify(r#"<span>"IN" 'STOCK'</span>"#, None);
        assert_eq!(result.status, Status::Available);
        assert_eq!(result.reason, "Matched keyword: in stock ('IN\" 'STOCK')");
    }

    #[test]
    fn test_multilingual_keywords() {
        assert_eq!(
            classify("<p>Товару немає в наявності</p>", None).status,
            Status::OutOfStock
        );
        assert_eq!(classify("<p>Brak w magazynie</p>", None).status, Status::OutOfStock);
        assert_eq!(classify("<p>Товар в наличии</p>", None).status, Status::Available);
    }

    #[test]
    fn test_page_wording_keeps_page_casing() {
        assert_eq!(page_wording("Status: Sold Out today", "sold out"), Some("Sold Out"));
        assert_eq!(page_wording("\"Sold\" out", "sold out"), Some("Sold\" out"));
        assert_eq!(page_wording("nothing here", "sold out"), None);
    }

    #[test]
    fn test_script_text_is_not_visible() {
        let html = r#"<html><head><script>var label = "sold out";</script></head>
            <body><p>Nice shoes</p></body></html>"#;
        let result = classify(html, None);
        assert_eq!(result.status, Status::Unknown);
        assert!(result.reason.contains("Nice shoes"));
        assert!(!result.reason.contains("var label"));
    }

    #[test]
    fn test_disabled_controls_are_ignored() {
        for html in [
            "<button disabled>Купити</button>",
            r#"<button class="btn disabled">Купити</button>"#,
            r#"<a aria-disabled="TRUE" href="/c">Купити</a>"#,
            r#"<a aria-disabled="1" href="/c">Купити</a>"#,
        ] {
            assert_eq!(classify(html, None).status, Status::Unknown, "{html}");
        }
        let enabled = classify(r#"<a aria-disabled="false" href="/c">Купити</a>"#, None);
        assert_eq!(enabled.status, Status::Available);
    }

    #[test]
    fn test_input_value_is_its_label() {
        let result = classify(r#"<form><input type="submit" value="В корзину"></form>"#, None);
        assert_eq!(result.status, Status::Available);
        assert_eq!(result.reason, "Clickable purchase control detected: 'В корзину'");
    }

    #[test]
    fn test_first_enabled_control_wins() {
        let html = r#"<button disabled>Купити</button><a href="/a">Додати в кошик</a><button>У кошик</button>"#;
        let result = classify(html, None);
        assert_eq!(
            result.reason,
            "Clickable purchase control detected: 'Додати в кошик'"
        );
    }

    #[test]
    fn test_selector_miss_is_unknown() {
        let html = "<html><body><button>Add to Cart</button></body></html>";
        let result = classify(html, Some("#price"));
        assert_eq!(result.status, Status::Unknown);
        assert!(result.reason.contains("#price"));
    }

    #[test]
    fn test_selector_zone_limits_keywords() {
        let html = r#"<div id="stock">Sold out</div><footer>Free delivery, items in stock ship today</footer>"#;
        let result = classify(html, Some("#stock"));
        assert_eq!(result.status, Status::OutOfStock);
        assert!(result.reason.contains("inside '#stock'"));

        let result = classify(html, Some("footer"));
        assert_eq!(result.status, Status::Available);
    }

    #[test]
    fn test_selector_zone_falls_through_to_buttons() {
        let html = r#"<div class="price">$19</div><p>out of stock elsewhere</p><button>Buy now</button>"#;
        let result = classify(html, Some(".price"));
        assert_eq!(result.status, Status::Available);
        assert!(result.reason.starts_with("Clickable purchase control"));
    }

    #[test]
    fn test_blank_selector_is_ignored() {
        let result = classify("<p>Sold out</p>", Some("   "));
        assert_eq!(result.status, Status::OutOfStock);
    }

    #[test]
    fn test_invalid_selector_is_unknown() {
        let result = classify("<p>Sold out</p>", Some("[[invalid"));
        assert_eq!(result.status, Status::Unknown);
        assert!(result.reason.starts_with("CSS selector parse error"));
    }

    #[test]
    fn test_fallback_sample_is_truncated() {
        let body = "lorem ".repeat(100);
        let result = classify(&format!("<p>{body}</p>"), None);
        assert_eq!(result.status, Status::Unknown);
        let sample = result
            .reason
            .trim_start_matches("No conclusive signals. Sample page text: '")
            .trim_end_matches('\'');
        assert!(sample.ends_with("..."));
        assert_eq!(sample.chars().count(), SAMPLE_CHARS + 3);
    }

    #[test]
    fn test_title_extracted() {
        let html = "<html><head><title>\n  Blue Kettle \n</title></head><body>Sold out</body></html>";
        let result = classify(html, None);
        assert_eq!(result.title.as_deref(), Some("Blue Kettle"));
        assert!(classify("<p>x</p>", None).title.is_none());
    }

    #[test]
    fn test_classification_is_deterministic() {
        let html = r#"<title>T</title><div class="p">Kup teraz</div><button>Dodaj do koszyka</button>"#;
        let classifier = Classifier::default();
        assert_eq!(
            classifier.classify(html, Some(".p")),
            classifier.classify(html, Some(".p"))
        );
        assert_eq!(classifier.classify(html, None), classifier.classify(html, None));
    }
}
