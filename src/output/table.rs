//! Table rendering for CLI output.

use tabled::builder::Builder;
use tabled::settings::object::Columns;
use tabled::settings::themes::Theme;
use tabled::settings::{Modify, Padding, Style};
use tabled::{Table, Tabled};

use crate::ec2::instances::Instance;
use crate::iam::policy::AssumedRole;

/// Row for the assumed role table.
#[derive(Tabled)]
struct RoleRow {
    #[tabled(rename = "ACCOUNT")]
    account: String,
    #[tabled(rename = "ROLE")]
    role: String,
    #[tabled(rename = "ROLE ARN")]
    role_arn: String,
}

/// Headerless `ip  name  # id` rows, instances without a public IP skipped.
pub fn render_hosts_table(instances: &[Instance]) -> String {
    let rows: Vec<[String; 3]> = instances
        .iter()
        .filter_map(|instance| {
            instance.public_ip().map(|ip| {
                [
                    ip.to_string(),
                    instance.display_name().to_string(),
                    format!("# {}", instance.id),
                ]
            })
        })
        .collect();

    if rows.is_empty() {
        return String::new();
    }

    let mut builder = Builder::default();
    for row in rows {
        builder.push_record(row);
    }

    let mut table = builder.build();
    apply_table_style(&mut table);
    table.to_string()
}

/// Assumed roles as an `ACCOUNT ROLE ROLE ARN` table.
pub fn render_roles_table(roles: &[AssumedRole]) -> String {
    let rows: Vec<RoleRow> = roles
        .iter()
        .map(|r| RoleRow {
            account: r.account.clone(),
            role: r.role.clone(),
            role_arn: r.role_arn(),
        })
        .collect();

    let mut table = Table::new(rows);
    apply_table_style(&mut table);
    table.to_string()
}

/// kubectl-style formatting: no borders, no separators, 2-space column gap.
fn apply_table_style(table: &mut Table) {
    let mut theme = Theme::from_style(Style::empty());
    theme.remove_horizontal_lines();
    table.with(theme);
    table.with(Modify::new(Columns::new(..)).with(Padding::new(0, 2, 0, 0)));
}
