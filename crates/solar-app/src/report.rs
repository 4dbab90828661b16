//! Text report and chart data for analysis results

use solar_types::{BatchResults, RooftopAnalysis, RooftopResult};

pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub const ENERGY_COLOR: [u8; 3] = [0x36, 0xA2, 0xEB];
pub const SAVINGS_BAR_COLOR: [u8; 3] = [0xFF, 0x63, 0x84];
pub const SAVINGS_LINE_COLOR: [u8; 3] = [0xFF, 0xD7, 0x00];

/// Format with a fixed number of decimals and comma thousands separators
pub fn format_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && formatted.chars().any(|c| c != '0' && c != '.') {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

fn payback_label(payback: Option<f64>) -> String {
    match payback {
        Some(years) => format!("{:.2} years", years),
        None => "not reached (no savings)".to_string(),
    }
}

fn format_success(rooftop_id: usize, a: &RooftopAnalysis, recommendations: &[String]) -> String {
    format!(
        "\n**Rooftop {id} Analysis**\n\
         - City: {city}\n\
         - Area: {area:.1} m²\n\
         - Orientation: {orientation}\n\
         - Obstructions: {obstructions}\n\
         - Surface Type: {surface}\n\
         - Suitability: {suitability}/10\n\
         - Panel Type: {panel}\n\
         \n\
         **Solar Potential**\n\
         - Annual Energy: {energy} kWh\n\
         - System Size: {size:.2} kW\n\
         \n\
         **ROI Estimation**\n\
         - Total Cost (after subsidy): ₹{cost}\n\
         - Annual Savings: ₹{savings}\n\
         - Payback Period: {payback}\n\
         \n\
         **Recommendations**\n\
         {recommendations}\n",
        id = rooftop_id,
        city = a.city,
        area = a.area_m2,
        orientation = a.orientation,
        obstructions = a.obstructions,
        surface = a.surface_type,
        suitability = a.suitability,
        panel = a.panel_type,
        energy = format_thousands(a.annual_energy_kwh, 2),
        size = a.system_size_kw,
        cost = format_thousands(a.total_cost_inr, 2),
        savings = format_thousands(a.annual_savings_inr, 2),
        payback = payback_label(a.payback_period_years),
        recommendations = recommendations.join("\n"),
    )
}

fn format_failure(result: &RooftopResult) -> String {
    format!(
        "\n**Rooftop {} Error**\n- {}\n**Recommendations**\n{}",
        result.rooftop_id,
        result.error.as_deref().unwrap_or("Unknown error"),
        result.recommendations.join("\n")
    )
}

/// Human-readable report for every rooftop of a batch
pub fn format_text_report(batch: &BatchResults) -> String {
    batch
        .results
        .iter()
        .map(|result| match &result.analysis {
            Some(analysis) => format_success(result.rooftop_id, analysis, &result.recommendations),
            None => format_failure(result),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Monthly series as `a, b, c`
pub fn join_values(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| format!("{:.2}", v))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Flattened `key: value` pairs of a result, recommendations excluded
pub fn result_fields(result: &RooftopResult) -> Vec<(&'static str, String)> {
    let mut fields = vec![
        ("rooftop_id", result.rooftop_id.to_string()),
        ("image_path", result.image_path.clone()),
    ];

    if let Some(a) = &result.analysis {
        fields.extend([
            ("city", a.city.clone()),
            ("area_m2", format!("{:.1}", a.area_m2)),
            ("orientation", a.orientation.to_string()),
            ("obstructions", a.obstructions.clone()),
            ("surface_type", a.surface_type.to_string()),
            ("suitability", a.suitability.to_string()),
            ("panel_type", a.panel_type.to_string()),
            ("ghi_w_m2", format!("{:.1}", a.irradiance.ghi)),
            ("dni_w_m2", format!("{:.1}", a.irradiance.dni)),
            ("dhi_w_m2", format!("{:.1}", a.irradiance.dhi)),
            ("annual_energy_kwh", format!("{:.2}", a.annual_energy_kwh)),
            ("monthly_energy_kwh", join_values(&a.monthly_energy_kwh)),
            ("system_size_kw", format!("{:.2}", a.system_size_kw)),
            ("total_cost_inr", format!("{:.2}", a.total_cost_inr)),
            ("annual_savings_inr", format!("{:.2}", a.annual_savings_inr)),
            ("monthly_savings_inr", join_values(&a.monthly_savings_inr)),
            (
                "payback_period_years",
                a.payback_period_years
                    .map(|y| format!("{:.2}", y))
                    .unwrap_or_default(),
            ),
        ]);
    }

    if let Some(error) = &result.error {
        fields.push(("error", error.clone()));
    }
    fields
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub value: f64,
    /// Label drawn on the bar
    pub text: String,
    pub color: [u8; 3],
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub y_axis: String,
    pub bars: Vec<Bar>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineSeries {
    pub name: String,
    pub values: Vec<f64>,
    pub labels: Vec<String>,
    pub color: [u8; 3],
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    pub title: String,
    pub x_axis: String,
    pub y_axis: String,
    pub categories: Vec<String>,
    pub series: Vec<LineSeries>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Charts {
    pub bar: BarChart,
    pub line: LineChart,
}

/// Chart data for one analyzed rooftop
pub fn build_charts(analysis: &RooftopAnalysis) -> Charts {
    let bar = BarChart {
        title: "Solar Potential and Savings".to_string(),
        y_axis: "Value".to_string(),
        bars: vec![
            Bar {
                label: "Annual Energy (kWh)".to_string(),
                value: analysis.annual_energy_kwh,
                text: format_thousands(analysis.annual_energy_kwh, 0),
                color: ENERGY_COLOR,
            },
            Bar {
                label: "Annual Savings (₹)".to_string(),
                value: analysis.annual_savings_inr,
                text: format!("₹{}", format_thousands(analysis.annual_savings_inr, 0)),
                color: SAVINGS_BAR_COLOR,
            },
        ],
    };

    let line = LineChart {
        title: "Monthly Energy and Savings".to_string(),
        x_axis: "Month".to_string(),
        y_axis: "Value".to_string(),
        categories: MONTH_LABELS.iter().map(|m| m.to_string()).collect(),
        series: vec![
            LineSeries {
                name: "Energy (kWh)".to_string(),
                values: analysis.monthly_energy_kwh.clone(),
                labels: analysis
                    .monthly_energy_kwh
                    .iter()
                    .map(|e| format_thousands(*e, 0))
                    .collect(),
                color: ENERGY_COLOR,
            },
            LineSeries {
                name: "Savings (₹)".to_string(),
                values: analysis.monthly_savings_inr.clone(),
                labels: analysis
                    .monthly_savings_inr
                    .iter()
                    .map(|s| format!("₹{}", format_thousands(*s, 0)))
                    .collect(),
                color: SAVINGS_LINE_COLOR,
            },
        ],
    };

    Charts { bar, line }
}

/// Charts for the first successful rooftop of a batch
pub fn build_batch_charts(batch: &BatchResults) -> Option<Charts> {
    batch.first_success().map(build_charts)
}
