//! Locating the metric in repository page markup.

use scraper::{Html, Selector};

use super::MetricError;

pub const DEFAULT_SELECTOR: &str = "span#repo-stars-counter-star";
pub const DEFAULT_ATTRIBUTE: &str = "title";

/// Which element carries the metric, and in which attribute.
#[derive(Debug, Clone)]
pub struct MetricSelector {
    css: String,
    selector: Selector,
    attribute: String,
}

impl MetricSelector {
    pub fn new(css: &str, attribute: &str) -> anyhow::Result<Self> {
        let selector = Selector::parse(css)
            .map_err(|e| anyhow::anyhow!("invalid metric selector {:?}: {}", css, e))?;
        if attribute.trim().is_empty() {
            anyhow::bail!("metric attribute must not be empty");
        }
        Ok(Self {
            css: css.to_string(),
            selector,
            attribute: attribute.trim().to_string(),
        })
    }

    /// Parses `html` and reads the metric from the first matching element.
    pub fn extract(&self, html: &str) -> Result<u64, MetricError> {
        let document = Html::parse_document(html);
        let element = document
            .select(&self.selector)
            .next()
            .ok_or_else(|| MetricError::ElementMissing {
                selector: self.css.clone(),
            })?;
        let raw = element
            .value()
            .attr(&self.attribute)
            .ok_or_else(|| MetricError::AttributeMissing {
                attribute: self.attribute.clone(),
            })?;
        parse_metric_value(raw).ok_or_else(|| MetricError::NotNumeric {
            value: raw.to_string(),
        })
    }
}

impl Default for MetricSelector {
    fn default() -> Self {
        Self {
            css: DEFAULT_SELECTOR.to_string(),
            selector: Selector::parse(DEFAULT_SELECTOR)
                .expect("DEFAULT_SELECTOR: hardcoded selector is valid"),
            attribute: DEFAULT_ATTRIBUTE.to_string(),
        }
    }
}

/// Strips thousands separators and parses what remains as a plain integer.
/// Anything but ASCII digits (signs, decimals, "1.2k") is rejected.
pub fn parse_metric_value(raw: &str) -> Option<u64> {
    let digits: String = raw.trim().chars().filter(|c| *c != ',').collect();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><body>
        <a href="/acme/one/stargazers">
          <span id="repo-stars-counter-star" title="12,345" class="Counter">12.3k</span>
        </a></body></html>"#;

    #[test]
    fn parse_metric_value_strips_separators() {
        assert_eq!(parse_metric_value("12,345"), Some(12_345));
        assert_eq!(parse_metric_value("1,234,567"), Some(1_234_567));
        assert_eq!(parse_metric_value("0"), Some(0));
        assert_eq!(parse_metric_value(" 42 "), Some(42));
    }

    #[test]
    fn parse_metric_value_rejects_non_digits() {
        assert_eq!(parse_metric_value(""), None);
        assert_eq!(parse_metric_value(","), None);
        assert_eq!(parse_metric_value("12.3k"), None);
        assert_eq!(parse_metric_value("-5"), None);
        assert_eq!(parse_metric_value("+5"), None);
    }

    #[test]
    fn extract_reads_title_attribute() {
        assert_eq!(MetricSelector::default().extract(PAGE).unwrap(), 12_345);
    }

    #[test]
    fn extract_missing_element() {
        let err = MetricSelector::default()
            .extract("<html><body><span id=\"other\" title=\"5\"></span></body></html>")
            .unwrap_err();
        assert!(matches!(err, MetricError::ElementMissing { .. }));
    }

    #[test]
    fn extract_missing_attribute() {
        let err = MetricSelector::default()
            .extract("<span id=\"repo-stars-counter-star\">5</span>")
            .unwrap_err();
        assert!(matches!(err, MetricError::AttributeMissing { .. }));
    }

    #[test]
    fn extract_non_numeric_attribute() {
        let err = MetricSelector::default()
            .extract("<span id=\"repo-stars-counter-star\" title=\"lots\"></span>")
            .unwrap_err();
        match err {
            MetricError::NotNumeric { value } => assert_eq!(value, "lots"),
            other => panic!("expected NotNumeric, got {other:?}"),
        }
    }

    #[test]
    fn custom_selector_and_attribute() {
        let sel = MetricSelector::new("meta[name=stars]", "content").unwrap();
        assert_eq!(sel.extract("<meta name=\"stars\" content=\"7\">").unwrap(), 7);
    }

    #[test]
    fn invalid_selector_rejected() {
        assert!(MetricSelector::new("span[[", "title").is_err());
        assert!(MetricSelector::new("span", " ").is_err());
    }
}
