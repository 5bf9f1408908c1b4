//! Package command handlers.

use dialoguer::{Confirm, Input, MultiSelect, Select};
use serde::Serialize;
use tabled::Tabled;

use netdesk_core::{
    Controller, CoreError, DataLimitUnit, EntityId, Field, Package, PackageAction, PackageConsole,
    PackageDetails, PackageDraft, PackageStats, PackageType, RouterOptions, RouterRevenue,
    SessionTimeUnit, actions_for,
};

use crate::cli::{
    DataUnit, GlobalOpts, PackageFields, PackageKind, PackagesArgs, PackagesCommand, SessionUnit,
};
use crate::error::CliError;
use crate::output;

use super::util;

type Console = PackageConsole<Controller>;

// ── Flag conversions ────────────────────────────────────────────────

impl From<PackageKind> for PackageType {
    fn from(kind: PackageKind) -> Self {
        match kind {
            PackageKind::Hotspot => Self::Hotspot,
            PackageKind::Pppoe => Self::Pppoe,
        }
    }
}

impl From<SessionUnit> for SessionTimeUnit {
    fn from(unit: SessionUnit) -> Self {
        match unit {
            SessionUnit::Minutes => Self::Minutes,
            SessionUnit::Hours => Self::Hours,
            SessionUnit::Days => Self::Days,
        }
    }
}

impl From<DataUnit> for DataLimitUnit {
    fn from(unit: DataUnit) -> Self {
        match unit {
            DataUnit::Mb => Self::Mb,
            DataUnit::Gb => Self::Gb,
        }
    }
}

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct PackageRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    kind: &'static str,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Speed (down/up)")]
    speed: String,
    #[tabled(rename = "Session")]
    session: String,
    #[tabled(rename = "Data")]
    data: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Customers")]
    customers: u32,
}

impl PackageRow {
    fn new(p: &Package, color: bool) -> Self {
        Self {
            id: p.id.to_string(),
            name: p.name.clone(),
            kind: p.package_type.label(),
            price: output::money(p.price),
            speed: format!("{}/{} Mbps", p.download_speed, p.upload_speed),
            session: output::session_length(p.session_time_minutes),
            data: if p.is_hotspot() {
                output::data_cap(p.data_limit_bytes)
            } else {
                "-".into()
            },
            status: output::status_label(p.is_active, color),
            customers: p.customer_count,
        }
    }
}

#[derive(Tabled)]
struct RevenueRow {
    #[tabled(rename = "Router ID")]
    id: String,
    #[tabled(rename = "Router")]
    name: String,
    #[tabled(rename = "Revenue")]
    revenue: String,
}

impl From<&RouterRevenue> for RevenueRow {
    fn from(r: &RouterRevenue) -> Self {
        Self {
            id: r.router_id.to_string(),
            name: r.router_name.clone(),
            revenue: output::money(r.revenue),
        }
    }
}

// ── Detail views ────────────────────────────────────────────────────

/// Detail payload plus the actions the session may take on it.
#[derive(Serialize)]
struct DetailView {
    #[serde(flatten)]
    details: PackageDetails,
    actions: Vec<&'static str>,
}

fn package_detail(p: &Package, color: bool) -> String {
    let routers = if p.router_ids.is_empty() {
        "all".to_owned()
    } else {
        p.router_ids
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut lines = vec![
        format!("ID:         {}", p.id),
        format!("Name:       {}", p.name),
        format!("Type:       {}", p.package_type.label()),
        format!("Price:      {}", output::money(p.price)),
        format!("Download:   {} Mbps", p.download_speed),
        format!("Upload:     {} Mbps", p.upload_speed),
    ];
    if p.is_hotspot() {
        lines.push(format!(
            "Session:    {}",
            output::session_length(p.session_time_minutes)
        ));
        lines.push(format!("Data Limit: {}", output::data_cap(p.data_limit_bytes)));
        lines.push(format!("Routers:    {routers}"));
        lines.push(format!("Vouchers:   {}", p.voucher_count));
    }
    lines.push(format!("Status:     {}", output::status_label(p.is_active, color)));
    lines.push(format!("Customers:  {}", p.customer_count));
    if let Some(created) = p.created_at {
        lines.push(format!("Created:    {}", created.format("%Y-%m-%d %H:%M")));
    }
    lines.join("\n")
}

fn stats_detail(s: &PackageStats) -> String {
    [
        format!("Clients:    {} total", s.total_clients),
        format!("  active:    {}", s.active_clients),
        format!("  expired:   {}", s.expired_clients),
        format!("  suspended: {}", s.suspended_clients),
        format!("Revenue:    {}", output::money(s.revenue)),
    ]
    .join("\n")
}

fn revenue_table(revenue: &[RouterRevenue]) -> String {
    if revenue.is_empty() {
        return "No revenue recorded.".into();
    }
    let rows: Vec<RevenueRow> = revenue.iter().map(RevenueRow::from).collect();
    output::render_table(&rows)
}

fn full_detail(view: &DetailView, color: bool) -> String {
    let mut sections = vec![package_detail(&view.details.package, color)];
    if let Some(ref stats) = view.details.stats {
        sections.push(stats_detail(stats));
    }
    if let Some(ref revenue) = view.details.router_revenue {
        sections.push(revenue_table(revenue));
    }
    if !view.actions.is_empty() {
        sections.push(format!("Actions:    {}", view.actions.join(", ")));
    }
    sections.join("\n\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    mut console: Console,
    args: PackagesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(global.color);

    match args.command {
        PackagesCommand::List { kind } => {
            let spinner = output::spinner("Fetching packages", global);
            let listing = console.refresh(kind.map(PackageType::from)).await;
            spinner.finish_and_clear();
            let listing = listing?;

            let out = output::render_list(
                global.output,
                &listing.packages,
                |p| PackageRow::new(p, color),
                |p| p.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PackagesCommand::Get { id } => {
            let spinner = output::spinner("Fetching package", global);
            let details = console.details(&EntityId::from(id)).await;
            spinner.finish_and_clear();

            let view = DetailView {
                details: details?,
                actions: actions_for(&console.permissions())
                    .into_iter()
                    .map(PackageAction::label)
                    .collect(),
            };
            let out = output::render_single(
                global.output,
                &view,
                |v| full_detail(v, color),
                |v| v.details.package.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PackagesCommand::Create {
            kind,
            fields,
            interactive,
        } => {
            console.open_create(kind.into()).await?;
            let created = fill_and_submit(&mut console, &fields, interactive).await?;
            output::notice(
                &format!("Package '{}' created ({})", created.name, created.id),
                global.quiet,
            );
            print_package(&created, global, color)
        }

        PackagesCommand::Update {
            id,
            fields,
            interactive,
        } => {
            let original = console.package(&EntityId::from(id)).await?;
            console.open_edit(&original).await?;
            let updated = fill_and_submit(&mut console, &fields, interactive).await?;
            output::notice(&format!("Package '{}' updated", updated.name), global.quiet);
            print_package(&updated, global, color)
        }

        PackagesCommand::Toggle { id } => {
            let package = console.package(&EntityId::from(id)).await?;
            let updated = console.toggle_status(&package).await?;
            let verb = if updated.is_active {
                "activated"
            } else {
                "deactivated"
            };
            output::notice(&format!("Package '{}' {verb}", updated.name), global.quiet);
            Ok(())
        }

        PackagesCommand::Delete { id } => {
            let package = console.package(&EntityId::from(id)).await?;
            let confirmation = console.request_delete(&package)?;
            if !util::confirm(&confirmation.prompt(), "packages delete", global.yes)? {
                output::notice("Aborted", global.quiet);
                return Ok(());
            }
            console.confirm_delete(confirmation).await?;
            output::notice(&format!("Package '{}' deleted", package.name), global.quiet);
            Ok(())
        }

        PackagesCommand::Stats { id } => {
            let stats = console.stats(&EntityId::from(id.clone())).await?;
            let out = output::render_single(global.output, &stats, stats_detail, |_| id.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PackagesCommand::Revenue { id } => {
            let revenue = console.router_revenue(&EntityId::from(id)).await?;
            let out = output::render_list(
                global.output,
                &revenue,
                |r| RevenueRow::from(r),
                |r| r.router_id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

fn print_package(package: &Package, global: &GlobalOpts, color: bool) -> Result<(), CliError> {
    let out = output::render_single(
        global.output,
        package,
        |p| package_detail(p, color),
        |p| p.id.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Form driving ────────────────────────────────────────────────────

/// Copy flag values into the open form, optionally prompt for the rest,
/// then submit. Interactive sessions get another round of prompts when
/// validation fails, and are offered one when the server refuses the
/// package, with the draft kept as typed.
async fn fill_and_submit(
    console: &mut Console,
    fields: &PackageFields,
    interactive: bool,
) -> Result<Package, CliError> {
    apply_fields(console, fields)?;
    if !interactive {
        return Ok(console.submit_form().await?);
    }
    if !util::is_interactive() {
        return Err(CliError::Validation {
            field: "interactive".into(),
            reason: "--interactive needs a terminal".into(),
        });
    }

    loop {
        prompt_fields(console)?;
        match console.submit_form().await {
            Ok(package) => return Ok(package),
            Err(CoreError::ValidationFailed(errors)) => {
                eprintln!("{errors}");
            }
            Err(e) if console.form().is_open() && retryable(&e) => {
                let message = console
                    .form()
                    .form()
                    .and_then(|open| open.error.clone())
                    .unwrap_or_else(|| e.user_message());
                eprintln!("{message}");
                let again = Confirm::new()
                    .with_prompt("Edit and try again?")
                    .default(true)
                    .interact()
                    .map_err(util::prompt_err)?;
                if !again {
                    console.form_mut().cancel();
                    return Err(e.into());
                }
            }
            Err(e) => {
                console.form_mut().cancel();
                return Err(e.into());
            }
        }
    }
}

/// A submit failure the user can fix by editing the draft. Lost grants
/// and a form in the wrong state cannot be.
fn retryable(err: &CoreError) -> bool {
    !matches!(
        err,
        CoreError::PermissionDenied { .. } | CoreError::InvalidState { .. }
    )
}

fn apply_fields(console: &mut Console, fields: &PackageFields) -> Result<(), CliError> {
    let form = console.form_mut();
    let text = [
        (Field::Name, &fields.name),
        (Field::Price, &fields.price),
        (Field::DownloadSpeed, &fields.download),
        (Field::UploadSpeed, &fields.upload),
        (Field::SessionTime, &fields.session_time),
    ];
    for (field, value) in text {
        if let Some(value) = value {
            form.set_field(field, value.as_str())?;
        }
    }
    if let Some(unit) = fields.session_unit {
        form.set_session_time_unit(unit.into())?;
    }
    if fields.no_data_limit {
        form.set_data_limit_enabled(false)?;
    }
    if let Some(ref limit) = fields.data_limit {
        form.set_data_limit_enabled(true)?;
        form.set_field(Field::DataLimit, limit.as_str())?;
    }
    if let Some(unit) = fields.data_unit {
        form.set_data_limit_unit(unit.into())?;
    }
    if fields.all_routers {
        form.set_routers(Vec::new())?;
    } else if !fields.routers.is_empty() {
        form.set_routers(fields.routers.iter().map(|r| EntityId::from(r.as_str())))?;
    }
    Ok(())
}

/// Current draft text for `field`, empty if the form has none.
fn current(console: &Console, field: Field) -> String {
    console
        .form()
        .form()
        .and_then(|f| f.draft.field(field))
        .unwrap_or_default()
        .to_owned()
}

fn ask(console: &mut Console, field: Field, prompt: &str) -> Result<(), CliError> {
    let value: String = Input::new()
        .with_prompt(prompt)
        .with_initial_text(current(console, field))
        .allow_empty(true)
        .interact_text()
        .map_err(util::prompt_err)?;
    console.form_mut().set_field(field, value)?;
    Ok(())
}

fn prompt_fields(console: &mut Console) -> Result<(), CliError> {
    let Some(open) = console.form().form().cloned() else {
        return Err(CliError::Validation {
            field: "form".into(),
            reason: "form is not open".into(),
        });
    };
    if let Some(ref message) = open.error {
        eprintln!("{message}");
    }

    ask(console, Field::Name, "Name")?;
    ask(console, Field::Price, "Price")?;
    ask(console, Field::DownloadSpeed, "Download speed (Mbps)")?;
    ask(console, Field::UploadSpeed, "Upload speed (Mbps)")?;

    let PackageDraft::Hotspot(draft) = &open.draft else {
        return Ok(());
    };

    ask(console, Field::SessionTime, "Session time")?;
    let units = [
        SessionTimeUnit::Minutes,
        SessionTimeUnit::Hours,
        SessionTimeUnit::Days,
    ];
    let picked = Select::new()
        .with_prompt("Session time unit")
        .items(&["minutes", "hours", "days"])
        .default(
            units
                .iter()
                .position(|u| *u == draft.session_time_unit)
                .unwrap_or(1),
        )
        .interact()
        .map_err(util::prompt_err)?;
    if let Some(unit) = units.get(picked) {
        console.form_mut().set_session_time_unit(*unit)?;
    }

    let limited = Confirm::new()
        .with_prompt("Limit data usage?")
        .default(draft.data_limit_enabled)
        .interact()
        .map_err(util::prompt_err)?;
    console.form_mut().set_data_limit_enabled(limited)?;
    if limited {
        ask(console, Field::DataLimit, "Data limit")?;
        let gb = Select::new()
            .with_prompt("Data limit unit")
            .items(&["MB", "GB"])
            .default(usize::from(draft.data_limit_unit == DataLimitUnit::Gb))
            .interact()
            .map_err(util::prompt_err)?;
        let unit = if gb == 1 {
            DataLimitUnit::Gb
        } else {
            DataLimitUnit::Mb
        };
        console.form_mut().set_data_limit_unit(unit)?;
    }

    if let RouterOptions::Loaded(routers) = &open.routers {
        if !routers.is_empty() {
            let labels: Vec<String> = routers.iter().map(|r| r.name.clone()).collect();
            let checked: Vec<bool> = routers
                .iter()
                .map(|r| draft.router_ids.contains(&r.id))
                .collect();
            let picked = MultiSelect::new()
                .with_prompt("Routers (none selected = all)")
                .items(&labels)
                .defaults(&checked)
                .interact()
                .map_err(util::prompt_err)?;
            let ids: Vec<EntityId> = picked
                .into_iter()
                .filter_map(|i| routers.get(i).map(|r| r.id.clone()))
                .collect();
            console.form_mut().set_routers(ids)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use netdesk_core::{Permission, PermissionSet};

    use super::*;

    fn hotspot() -> Package {
        Package {
            id: EntityId::from("12"),
            package_type: PackageType::Hotspot,
            name: "1 Hour".into(),
            price: 50.0,
            download_speed: 8,
            upload_speed: 4,
            session_time_minutes: Some(60),
            data_limit_bytes: None,
            router_ids: Vec::new(),
            is_active: true,
            customer_count: 5,
            voucher_count: 20,
            created_at: None,
        }
    }

    #[test]
    fn row_shows_human_units() {
        let row = PackageRow::new(&hotspot(), false);
        assert_eq!(row.kind, "Hotspot");
        assert_eq!(row.price, "50.00");
        assert_eq!(row.speed, "8/4 Mbps");
        assert_eq!(row.session, "1h");
        assert_eq!(row.data, "unlimited");
        assert_eq!(row.status, "active");
    }

    #[test]
    fn detail_lists_only_granted_actions() {
        let granted = PermissionSet::new([Permission::PackagesView, Permission::PackagesEdit]);
        let view = DetailView {
            details: PackageDetails {
                package: hotspot(),
                stats: None,
                router_revenue: None,
            },
            actions: actions_for(&granted)
                .into_iter()
                .map(PackageAction::label)
                .collect(),
        };
        let text = full_detail(&view, false);
        assert!(text.contains("Actions:    edit, toggle"));
        assert!(!text.contains("delete"));
        assert!(text.contains("Routers:    all"));
    }

    #[test]
    fn detail_includes_stats_and_revenue_when_present() {
        let view = DetailView {
            details: PackageDetails {
                package: hotspot(),
                stats: Some(PackageStats {
                    total_clients: 10,
                    active_clients: 6,
                    expired_clients: 3,
                    suspended_clients: 1,
                    revenue: 500.0,
                }),
                router_revenue: Some(Vec::new()),
            },
            actions: Vec::new(),
        };
        let text = full_detail(&view, false);
        assert!(text.contains("Clients:    10 total"));
        assert!(text.contains("No revenue recorded."));
    }

    #[test]
    fn server_refusals_are_retryable() {
        assert!(retryable(&CoreError::Api {
            message: Some("Name already taken".into()),
            code: None,
            status: Some(422),
        }));
        assert!(retryable(&CoreError::Timeout {
            timeout_secs: Some(30)
        }));
        assert!(!retryable(&CoreError::PermissionDenied {
            permission: Permission::PackagesCreate
        }));
        assert!(!retryable(&CoreError::InvalidState {
            message: "form is not open".into()
        }));
    }

    #[test]
    fn flag_units_map_to_domain_units() {
        assert_eq!(SessionTimeUnit::from(SessionUnit::Days), SessionTimeUnit::Days);
        assert_eq!(DataLimitUnit::from(DataUnit::Gb), DataLimitUnit::Gb);
        assert_eq!(PackageType::from(PackageKind::Pppoe), PackageType::Pppoe);
    }
}
