//! Chart.js configurations built from backend data.
//!
//! Everything here is plain data: the JS callbacks a chart needs (tick and
//! tooltip formatters) are described by [`Formatter`] and attached by
//! `chartjs` when the chart is created.

use std::rc::Rc;

use serde_json::{json, Value};

use crate::api::{CategoryBreakdown, CategoryCount, MonthlyStat};
use crate::format::{format_currency, format_plain_number, month_label, title_case};

pub const PALETTE: [&str; 10] = [
    "#d9c7a7", "#5a8a64", "#e6a23c", "#409eff", "#c25450", "#7b68ee", "#ff6b6b", "#4ecdc4",
    "#45b7d1", "#96ceb4",
];

/// Counts are plotted multiplied by this so they share a visual range with
/// amounts; the secondary axis divides it back out.
pub const COUNT_SCALE: f64 = 1000.0;

/// Colours read from the body's CSS custom properties.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ThemeColors {
    pub text_primary: String,
    pub text_secondary: String,
    pub accent: String,
    pub bg_secondary: String,
    pub success: String,
}

fn translucent(color: &str) -> String {
    format!("{}20", color)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickFormat {
    Currency,
    ScaledCount,
    ShareOfTotal,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Formatter {
    /// Object path inside the config where the callback is stored.
    pub path: &'static [&'static str],
    pub format: TickFormat,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChartSpec {
    pub config: Value,
    pub formatters: Vec<Formatter>,
}

pub fn tick_label(format: TickFormat, value: f64, currency: &str) -> String {
    match format {
        TickFormat::Currency => format_currency(value, currency),
        TickFormat::ScaledCount => format!("{:.0}", value / COUNT_SCALE),
        TickFormat::ShareOfTotal => format_plain_number(value),
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ChartSource {
    Category(Rc<Vec<CategoryCount>>),
    Monthly(Rc<Vec<MonthlyStat>>),
    Volume(Rc<Vec<CategoryBreakdown>>),
}

impl ChartSource {
    /// `None` when there is nothing to plot.
    pub fn spec(&self, colors: &ThemeColors) -> Option<ChartSpec> {
        match self {
            ChartSource::Category(data) => category_chart(data, colors),
            ChartSource::Monthly(data) => monthly_chart(data, colors),
            ChartSource::Volume(data) => volume_chart(data, colors),
        }
    }
}

pub fn category_chart(data: &[CategoryCount], colors: &ThemeColors) -> Option<ChartSpec> {
    if data.is_empty() {
        return None;
    }

    let labels: Vec<String> = data.iter().map(|d| title_case(&d.category)).collect();
    let counts: Vec<u64> = data.iter().map(|d| d.count).collect();

    let config = json!({
        "type": "doughnut",
        "data": {
            "labels": labels,
            "datasets": [{
                "data": counts,
                "backgroundColor": PALETTE,
                "borderColor": colors.bg_secondary,
                "borderWidth": 2
            }]
        },
        "options": {
            "plugins": {
                "legend": {
                    "position": "bottom",
                    "labels": {
                        "color": colors.text_primary,
                        "padding": 15,
                        "font": { "size": 12 }
                    }
                },
                "tooltip": { "callbacks": {} }
            }
        }
    });

    Some(ChartSpec {
        config,
        formatters: vec![Formatter {
            path: &["options", "plugins", "tooltip", "callbacks", "label"],
            format: TickFormat::ShareOfTotal,
        }],
    })
}

pub fn monthly_chart(data: &[MonthlyStat], colors: &ThemeColors) -> Option<ChartSpec> {
    if data.is_empty() {
        return None;
    }

    let labels: Vec<String> = data.iter().map(|d| month_label(d.year, d.month)).collect();
    let amounts: Vec<f64> = data.iter().map(|d| d.total_amount).collect();
    let counts: Vec<f64> = data.iter().map(|d| d.count as f64 * COUNT_SCALE).collect();

    let config = json!({
        "type": "line",
        "data": {
            "labels": labels,
            "datasets": [{
                "label": "Transaction Amount",
                "data": amounts,
                "borderColor": colors.accent,
                "backgroundColor": translucent(&colors.accent),
                "borderWidth": 3,
                "tension": 0.4,
                "fill": true
            }, {
                "label": "Transaction Count",
                "data": counts,
                "borderColor": colors.success,
                "backgroundColor": translucent(&colors.success),
                "borderWidth": 3,
                "tension": 0.4,
                "fill": true,
                "yAxisID": "y1"
            }]
        },
        "options": {
            "plugins": {
                "legend": { "labels": { "color": colors.text_primary } }
            },
            "scales": {
                "x": {
                    "grid": { "color": colors.bg_secondary },
                    "ticks": { "color": colors.text_secondary }
                },
                "y": {
                    "position": "left",
                    "grid": { "color": colors.bg_secondary },
                    "ticks": { "color": colors.text_secondary }
                },
                "y1": {
                    "position": "right",
                    "grid": { "display": false },
                    "ticks": { "color": colors.text_secondary }
                }
            }
        }
    });

    Some(ChartSpec {
        config,
        formatters: vec![
            Formatter {
                path: &["options", "scales", "y", "ticks", "callback"],
                format: TickFormat::Currency,
            },
            Formatter {
                path: &["options", "scales", "y1", "ticks", "callback"],
                format: TickFormat::ScaledCount,
            },
        ],
    })
}

pub fn volume_chart(data: &[CategoryBreakdown], colors: &ThemeColors) -> Option<ChartSpec> {
    if data.is_empty() {
        return None;
    }

    let labels: Vec<String> = data.iter().map(|c| title_case(&c.key)).collect();
    let amounts: Vec<f64> = data.iter().map(|c| c.amount).collect();

    let config = json!({
        "type": "bar",
        "data": {
            "labels": labels,
            "datasets": [{
                "label": "Total Amount",
                "data": amounts,
                "backgroundColor": colors.accent,
                "borderColor": colors.accent,
                "borderWidth": 1
            }]
        },
        "options": {
            "plugins": { "legend": { "display": false } },
            "scales": {
                "x": {
                    "grid": { "display": false },
                    "ticks": {
                        "color": colors.text_secondary,
                        "maxRotation": 45,
                        "minRotation": 45
                    }
                },
                "y": {
                    "grid": { "color": colors.bg_secondary },
                    "ticks": { "color": colors.text_secondary }
                }
            }
        }
    });

    Some(ChartSpec {
        config,
        formatters: vec![Formatter {
            path: &["options", "scales", "y", "ticks", "callback"],
            format: TickFormat::Currency,
        }],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn colors() -> ThemeColors {
        ThemeColors {
            text_primary: "#111111".to_string(),
            text_secondary: "#666666".to_string(),
            accent: "#d9c7a7".to_string(),
            bg_secondary: "#f5f5f5".to_string(),
            success: "#5a8a64".to_string(),
        }
    }

    /// Every formatter must point at an existing parent object.
    fn assert_paths_resolve(spec: &ChartSpec) {
        for formatter in &spec.formatters {
            let (_, parents) = formatter.path.split_last().unwrap();
            let mut node = &spec.config;
            for key in parents {
                node = node.get(*key).unwrap_or_else(|| panic!("missing {key}"));
            }
            assert!(node.is_object());
        }
    }

    #[test]
    fn empty_datasets_render_placeholders() {
        assert!(category_chart(&[], &colors()).is_none());
        assert!(monthly_chart(&[], &colors()).is_none());
        assert!(volume_chart(&[], &colors()).is_none());
        assert!(ChartSource::Volume(Rc::new(Vec::new())).spec(&colors()).is_none());
    }

    #[test]
    fn category_chart_labels_and_counts() {
        let data = vec![
            CategoryCount {
                category: "mobile_money_transfer".to_string(),
                count: 4,
            },
            CategoryCount {
                category: "Airtime".to_string(),
                count: 2,
            },
        ];
        let spec = category_chart(&data, &colors()).unwrap();
        assert_eq!(
            spec.config["data"]["labels"],
            json!(["Mobile Money Transfer", "Airtime"])
        );
        assert_eq!(spec.config["data"]["datasets"][0]["data"], json!([4, 2]));
        assert_eq!(spec.config["data"]["datasets"][0]["borderColor"], "#f5f5f5");
        assert_paths_resolve(&spec);
    }

    #[test]
    fn monthly_chart_scales_counts_onto_secondary_axis() {
        let data = vec![
            MonthlyStat {
                year: 2024,
                month: 1,
                total_amount: 15_000.0,
                count: 3,
            },
            MonthlyStat {
                year: 2024,
                month: 2,
                total_amount: 9_000.0,
                count: 7,
            },
        ];
        let spec = monthly_chart(&data, &colors()).unwrap();
        assert_eq!(spec.config["data"]["labels"], json!(["Jan 2024", "Feb 2024"]));
        assert_eq!(
            spec.config["data"]["datasets"][1]["data"],
            json!([3000.0, 7000.0])
        );
        assert_eq!(spec.config["data"]["datasets"][1]["yAxisID"], "y1");
        assert_eq!(spec.config["data"]["datasets"][0]["backgroundColor"], "#d9c7a720");
        assert_paths_resolve(&spec);
    }

    #[test]
    fn volume_chart_follows_breakdown_order() {
        let data = vec![
            CategoryBreakdown {
                key: "transfer".to_string(),
                count: 1,
                amount: 3000.0,
            },
            CategoryBreakdown {
                key: "bank_deposit".to_string(),
                count: 2,
                amount: 1000.0,
            },
        ];
        let spec = volume_chart(&data, &colors()).unwrap();
        assert_eq!(spec.config["data"]["labels"], json!(["Transfer", "Bank Deposit"]));
        assert_eq!(spec.config["data"]["datasets"][0]["data"], json!([3000.0, 1000.0]));
        assert_paths_resolve(&spec);
    }

    #[test]
    fn tick_labels() {
        assert_eq!(tick_label(TickFormat::Currency, 25_000.0, "RWF"), "25,000 RWF");
        assert_eq!(tick_label(TickFormat::ScaledCount, 7_000.0, "RWF"), "7");
        assert_eq!(tick_label(TickFormat::ScaledCount, 2_400.0, "RWF"), "2");
    }
}
