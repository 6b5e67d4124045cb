//! Table, diff and JSON renderings of evaluated projects.

use std::collections::HashSet;

use anyhow::Result;
use costgraph_schema::{CostComponent, Project, Resource, ResourceDiff, Root};
use rust_decimal::Decimal;

use crate::pipeline::unsupported;

const HEADER: [&str; 6] = ["NAME", "MONTHLY QTY", "UNIT", "PRICE", "HOURLY COST", "MONTHLY COST"];
const RIGHT_ALIGNED: [bool; 6] = [false, true, false, true, true, true];

type Row = [String; 6];

#[derive(Default)]
struct Table {
    rows: Vec<Row>,
}

impl Table {
    fn push(&mut self, row: Row) {
        self.rows.push(row);
    }

    fn label(&mut self, name: impl Into<String>) {
        self.push([name.into(), String::new(), String::new(), String::new(), String::new(), String::new()]);
    }

    fn blank(&mut self) {
        self.label("");
    }

    fn render(&self) -> String {
        let header: Row = HEADER.map(str::to_string);
        let mut widths = [0usize; 6];
        for row in std::iter::once(&header).chain(&self.rows) {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        let mut out = String::new();
        for row in std::iter::once(&header).chain(&self.rows) {
            let cells: Vec<String> = row
                .iter()
                .enumerate()
                .map(|(i, cell)| {
                    if RIGHT_ALIGNED[i] {
                        format!("{:>width$}", cell, width = widths[i])
                    } else {
                        format!("{:<width$}", cell, width = widths[i])
                    }
                })
                .collect();
            out.push_str(cells.join("  ").trim_end());
            out.push('\n');
        }
        out
    }
}

pub fn format_cost(cost: Decimal) -> String {
    if !cost.is_zero() && cost.abs() < Decimal::new(1, 2) {
        format!("{:.4}", cost.round_dp(4))
    } else {
        format!("{:.2}", cost.round_dp(2))
    }
}

fn format_optional_cost(cost: Option<Decimal>) -> String {
    cost.map(format_cost).unwrap_or_else(|| "-".to_string())
}

fn format_quantity(quantity: Option<Decimal>) -> String {
    quantity
        .map(|q| q.round_dp(4).normalize().to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn format_delta(delta: Decimal) -> String {
    let sign = if delta.is_sign_negative() && !delta.is_zero() { "-" } else { "+" };
    format!("{}${}", sign, format_cost(delta.abs()))
}

fn component_rows(table: &mut Table, components: &[CostComponent], prefix: &str, has_sub_resources: bool) {
    for (i, c) in components.iter().enumerate() {
        let branch = if !has_sub_resources && i == components.len() - 1 { "└─" } else { "├─" };
        table.push([
            format!("{}{} {}", prefix, branch, c.name),
            format_quantity(c.monthly_quantity()),
            c.unit.clone(),
            format_optional_cost(c.price()),
            format_optional_cost(c.hourly_cost()),
            format_optional_cost(c.monthly_cost()),
        ]);
    }
}

fn sub_resource_rows(table: &mut Table, sub_resources: &[Resource], prefix: &str) {
    for (i, r) in sub_resources.iter().enumerate() {
        let last = i == sub_resources.len() - 1;
        let (branch, next) = if last { ("└─", "   ") } else { ("├─", "│  ") };
        let next_prefix = format!("{}{}", prefix, next);

        table.label(format!("{}{} {}", prefix, branch, r.name));
        component_rows(table, &r.cost_components, &next_prefix, !r.sub_resources.is_empty());
        sub_resource_rows(table, &r.sub_resources, &next_prefix);
    }
}

/// Cost breakdown tables, one per project, followed by the overall total.
pub fn render_table(projects: &[Project], show_skipped: bool) -> String {
    let mut out = String::new();
    let mut overall_hourly = Decimal::ZERO;
    let mut overall_monthly = Decimal::ZERO;

    for project in projects {
        let mut table = Table::default();
        for r in project.resources.iter().filter(|r| !r.is_skipped) {
            table.label(&r.name);
            component_rows(&mut table, &r.cost_components, "", !r.sub_resources.is_empty());
            sub_resource_rows(&mut table, &r.sub_resources, "");
            table.push([
                "Total".to_string(),
                String::new(),
                String::new(),
                String::new(),
                format_cost(r.hourly_cost()),
                format_cost(r.monthly_cost()),
            ]);
            table.blank();
        }

        let totals = project.totals();
        overall_hourly += totals.hourly_cost;
        overall_monthly += totals.monthly_cost;
        table.push([
            "PROJECT TOTAL".to_string(),
            String::new(),
            String::new(),
            String::new(),
            format_cost(totals.hourly_cost),
            format_cost(totals.monthly_cost),
        ]);

        out.push_str(&format!("Project: {}\n\n", project.name));
        out.push_str(&table.render());
        out.push_str(&skipped_message(project, show_skipped));
        out.push('\n');
    }

    if projects.len() > 1 {
        out.push_str(&format!(
            "OVERALL TOTAL  {} hourly  {} monthly\n",
            format_cost(overall_hourly),
            format_cost(overall_monthly)
        ));
    }
    out
}

fn skipped_message(project: &Project, show_skipped: bool) -> String {
    let skipped = unsupported(&project.resources).count();
    if skipped == 0 {
        return String::new();
    }

    let mut message = format!(
        "\n{} out of {} resources couldn't be estimated as they are not supported yet",
        skipped,
        project.resources.len()
    );
    if show_skipped {
        message.push_str(".\n");
        for (resource_type, count) in &project.summary().unsupported_counts {
            message.push_str(&format!("{} x {}\n", count, resource_type));
        }
    } else {
        message.push_str(", re-run with --show-skipped to see the list.\n");
    }
    message
}

/// Cost changes between prior state and plan, per project.
pub fn render_diff(projects: &[Project]) -> String {
    let mut out = String::new();

    for project in projects {
        out.push_str(&format!("Project: {}\n\n", project.name));

        let past: HashSet<&str> = project.past_resources.iter().map(|r| r.name.as_str()).collect();
        let current: HashSet<&str> = project.resources.iter().map(|r| r.name.as_str()).collect();

        if let Some(diff) = &project.diff {
            for r in diff.resources.iter().filter(|r| !r.monthly_cost.is_zero()) {
                let marker = match (past.contains(r.name.as_str()), current.contains(r.name.as_str())) {
                    (false, true) => "+",
                    (true, false) => "-",
                    _ => "~",
                };
                resource_diff_lines(&mut out, r, marker, "");
                out.push('\n');
            }
        }

        let past_totals = project.past_totals();
        let totals = project.totals();
        out.push_str(&format!(
            "Monthly cost change for {}\nAmount: {}/month ({} → {})\n\n",
            project.name,
            format_delta(totals.monthly_cost - past_totals.monthly_cost),
            format_cost(past_totals.monthly_cost),
            format_cost(totals.monthly_cost)
        ));
    }
    out
}

fn resource_diff_lines(out: &mut String, r: &ResourceDiff, marker: &str, indent: &str) {
    out.push_str(&format!("{}{} {}\n", indent, marker, r.name));
    out.push_str(&format!("{}  {}/month\n", indent, format_delta(r.monthly_cost)));

    let nested = format!("{}    ", indent);
    for c in r.cost_components.iter().filter(|c| !c.monthly_cost.is_zero()) {
        out.push_str(&format!("{}~ {}  {}/month\n", nested, c.name, format_delta(c.monthly_cost)));
    }
    for sub in r.sub_resources.iter().filter(|s| !s.monthly_cost.is_zero()) {
        resource_diff_lines(out, sub, "~", &nested);
    }
}

pub fn render_json(projects: &[Project]) -> Result<String> {
    Ok(Root::from_projects(projects).to_json()?)
}
