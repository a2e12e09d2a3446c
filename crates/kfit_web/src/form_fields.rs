//! Reading plot settings out of the `#draw` form's fields.
//!
//! Blank or unparsable fields fall back to the defaults, matching how the
//! server treats the same form.

use kfit::plot::PlotSpec;

pub const DEFAULT_CLUSTERS: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct FitSettings {
    pub clusters: usize,
    pub spec: PlotSpec,
}

fn parse_usize(v: Option<String>) -> Option<usize> {
    v.and_then(|s| s.trim().parse::<usize>().ok())
}

/// Build fit settings from a field lookup (`name` -> current value).
pub fn fit_settings<F>(field: F) -> FitSettings
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = PlotSpec::default();
    let title = field("title")
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or(defaults.title);

    FitSettings {
        clusters: parse_usize(field("clusters"))
            .filter(|&k| k > 0)
            .unwrap_or(DEFAULT_CLUSTERS),
        spec: PlotSpec {
            width: parse_usize(field("width")).unwrap_or(defaults.width),
            height: parse_usize(field("height")).unwrap_or(defaults.height),
            padding: parse_usize(field("padding")).unwrap_or(defaults.padding),
            title,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn empty_form_uses_defaults() {
        let s = fit_settings(lookup(&[]));
        assert_eq!(s.clusters, DEFAULT_CLUSTERS);
        assert_eq!(s.spec, PlotSpec::default());
    }

    #[test]
    fn filled_form_overrides_defaults() {
        let s = fit_settings(lookup(&[
            ("clusters", "5"),
            ("width", " 640 "),
            ("height", "480"),
            ("padding", "20"),
            ("title", "Iris"),
        ]));
        assert_eq!(s.clusters, 5);
        assert_eq!(s.spec.width, 640);
        assert_eq!(s.spec.height, 480);
        assert_eq!(s.spec.padding, 20);
        assert_eq!(s.spec.title, "Iris");
    }

    #[test]
    fn junk_and_zero_fall_back() {
        let s = fit_settings(lookup(&[("clusters", "0"), ("width", "wide"), ("title", "  ")]));
        assert_eq!(s.clusters, DEFAULT_CLUSTERS);
        assert_eq!(s.spec.width, PlotSpec::default().width);
        assert_eq!(s.spec.title, PlotSpec::default().title);
    }
}
