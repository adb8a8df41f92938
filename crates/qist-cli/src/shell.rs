use crate::{
    command::{Command, HELP, Kind, ParseError},
    render::{Render, counts_footer},
};
use qist_core::{
    admin::{Admin, Collection},
    error::InternalError,
    form::{
        BranchDraft, FormBinding, FormError, ImageUpload, InstallmentPlanDraft, ProductDraft,
        UploadError,
    },
    model::{
        branch::Branch,
        cart::{Cart, CartStatus},
        installment_plan::InstallmentPlan,
        product::Product,
        query::{Query, QueryStatus},
    },
    obs::metrics_report,
    session::SessionStorage,
    status::UnknownStatus,
    traits::EntityKind,
    types::{EntityId, Timestamp},
};
use std::{
    fs,
    io::{self, Write},
    path::Path,
};
use thiserror::Error as ThisError;
use tracing::debug;

///
/// ShellError
///

#[derive(Debug, ThisError)]
pub enum ShellError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("{}", .0.display_with_class())]
    Core(#[from] InternalError),

    #[error("please log in first")]
    LoginRequired,

    #[error("{0} rows are read-only; use process/resolve")]
    ReadOnly(Kind),

    #[error("no {kind} with id {id}")]
    Missing { kind: Kind, id: EntityId },

    #[error("{kind} rows have no {filter} to filter on")]
    UnsupportedFilter { kind: Kind, filter: &'static str },

    #[error(transparent)]
    Status(#[from] UnknownStatus),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("metrics: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<FormError> for ShellError {
    fn from(err: FormError) -> Self {
        Self::Core(err.into())
    }
}

///
/// Flow
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Flow {
    Continue,
    Quit,
}

///
/// Shell
///
/// Executes parsed commands against an [`Admin`] and writes results to a
/// caller-supplied sink. Confirmation prompts go through `confirm`.
///

pub struct Shell<S: SessionStorage> {
    admin: Admin<S>,
}

impl<S: SessionStorage> Shell<S> {
    #[must_use]
    pub const fn new(admin: Admin<S>) -> Self {
        Self { admin }
    }

    #[must_use]
    pub const fn admin(&self) -> &Admin<S> {
        &self.admin
    }

    /// Parse and run one input line.
    pub fn run_line(
        &mut self,
        line: &str,
        out: &mut dyn Write,
        confirm: &mut dyn FnMut(&str) -> bool,
    ) -> Result<Flow, ShellError> {
        match Command::parse(line)? {
            Some(command) => self.execute(command, out, confirm),
            None => Ok(Flow::Continue),
        }
    }

    pub fn execute(
        &mut self,
        command: Command,
        out: &mut dyn Write,
        confirm: &mut dyn FnMut(&str) -> bool,
    ) -> Result<Flow, ShellError> {
        debug!(?command, "execute");

        match command {
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Quit => return Ok(Flow::Quit),
            Command::Login { username, password } => {
                if self.admin.session_mut().login(&username, &password).map_err(InternalError::from)? {
                    self.whoami(out)?;
                } else {
                    writeln!(out, "login failed: username and password are required")?;
                }
            }
            command => {
                if !self.admin.session().is_logged_in() {
                    return Err(ShellError::LoginRequired);
                }
                self.execute_authenticated(command, out, confirm)?;
            }
        }

        Ok(Flow::Continue)
    }

    fn execute_authenticated(
        &mut self,
        command: Command,
        out: &mut dyn Write,
        confirm: &mut dyn FnMut(&str) -> bool,
    ) -> Result<(), ShellError> {
        match command {
            Command::Logout => {
                self.admin.session_mut().logout().map_err(InternalError::from)?;
                writeln!(out, "logged out")?;
            }
            Command::Whoami => self.whoami(out)?,
            Command::Profile { name, email } => {
                let user = self
                    .admin
                    .session_mut()
                    .update_profile(&name, &email)
                    .map_err(InternalError::from)?;
                writeln!(out, "profile updated: {}", user.render())?;
            }
            Command::Password { old, new, confirm } => {
                self.admin
                    .session()
                    .update_password(&old, &new, &confirm)
                    .map_err(InternalError::from)?;
                writeln!(out, "password updated")?;
            }
            Command::List {
                kind,
                query,
                status,
                since,
            } => {
                let filters = ListFilters {
                    status: status.as_deref(),
                    since,
                };
                self.list(kind, &query, filters, out)?;
            }
            Command::Add { kind, fields } => self.save(kind, None, &fields, out)?,
            Command::Edit { kind, id, fields } => self.save(kind, Some(id), &fields, out)?,
            Command::Delete { kind, id } => self.delete(kind, id, out, confirm)?,
            Command::Upload { id, path } => self.upload(id, &path, out)?,
            Command::Process(id) => {
                let cart = self.admin.process_cart(id)?;
                writeln!(out, "{}", cart.render())?;
            }
            Command::Resolve(id) => {
                let query = self.admin.resolve_query(id)?;
                writeln!(out, "{}", query.render())?;
            }
            Command::Plans(id) => {
                let product = self
                    .admin
                    .get::<Product>(id)
                    .ok_or(ShellError::Missing { kind: Kind::Product, id })?;
                for name in self.admin.plan_names(product) {
                    writeln!(out, "{name}")?;
                }
            }
            Command::Summary => writeln!(out, "{}", self.admin.summary().render())?,
            Command::Metrics => {
                writeln!(out, "{}", serde_json::to_string_pretty(&metrics_report())?)?;
            }
            Command::Help | Command::Quit | Command::Login { .. } => {}
        }

        Ok(())
    }

    fn whoami(&self, out: &mut dyn Write) -> io::Result<()> {
        match self.admin.session().current_user() {
            Some(user) => writeln!(out, "{}", user.render()),
            None => writeln!(out, "not logged in"),
        }
    }

    fn list(
        &self,
        kind: Kind,
        query: &str,
        filters: ListFilters<'_>,
        out: &mut dyn Write,
    ) -> Result<(), ShellError> {
        let since = filters.since;

        match kind {
            Kind::Product => {
                filters.reject_status(kind)?;
                self.list_rows::<Product>(query, |p| since.is_none_or(|t| p.date_added >= t), out)?;
            }
            Kind::Plan => {
                filters.reject_all(kind)?;
                self.list_rows::<InstallmentPlan>(query, |_| true, out)?;
            }
            Kind::Branch => {
                filters.reject_all(kind)?;
                self.list_rows::<Branch>(query, |_| true, out)?;
            }
            Kind::Cart => {
                let status = filters.status.map(str::parse::<CartStatus>).transpose()?;
                self.list_rows::<Cart>(
                    query,
                    |c| status.is_none_or(|s| c.status == s) && since.is_none_or(|t| c.added_at >= t),
                    out,
                )?;
                writeln!(out, "{}", counts_footer(self.admin.pending_count(query), "Pending"))?;
            }
            Kind::Query => {
                let status = filters.status.map(str::parse::<QueryStatus>).transpose()?;
                self.list_rows::<Query>(
                    query,
                    |q| status.is_none_or(|s| q.status == s) && since.is_none_or(|t| q.submitted_at >= t),
                    out,
                )?;
                writeln!(out, "{}", counts_footer(self.admin.open_count(query), "Open"))?;
            }
        }

        Ok(())
    }

    fn list_rows<E: Collection + Render>(
        &self,
        query: &str,
        keep: impl Fn(&E) -> bool,
        out: &mut dyn Write,
    ) -> io::Result<()> {
        let rows: Vec<&E> = self
            .admin
            .list::<E>(query)
            .into_iter()
            .filter(|row| keep(*row))
            .collect();
        if rows.is_empty() {
            writeln!(out, "(no matches)")?;
        }
        for row in rows {
            writeln!(out, "{}", row.render())?;
        }

        Ok(())
    }

    fn save(
        &mut self,
        kind: Kind,
        id: Option<EntityId>,
        fields: &[(String, String)],
        out: &mut dyn Write,
    ) -> Result<(), ShellError> {
        let line = match kind {
            Kind::Product => self.save_draft::<ProductDraft>(id, fields)?,
            Kind::Plan => self.save_draft::<InstallmentPlanDraft>(id, fields)?,
            Kind::Branch => self.save_draft::<BranchDraft>(id, fields)?,
            Kind::Cart | Kind::Query => return Err(ShellError::ReadOnly(kind)),
        };
        writeln!(out, "{} {line}", if id.is_some() { "updated" } else { "created" })?;

        Ok(())
    }

    fn save_draft<F>(
        &mut self,
        id: Option<EntityId>,
        fields: &[(String, String)],
    ) -> Result<String, ShellError>
    where
        F: FormBinding,
        F::Entity: Collection + Render,
    {
        let mut draft: F = self.admin.open(id)?;
        for (field, value) in fields {
            draft.set_field(field, value)?;
        }

        Ok(self.admin.save(&draft)?.render())
    }

    fn delete(
        &mut self,
        kind: Kind,
        id: EntityId,
        out: &mut dyn Write,
        confirm: &mut dyn FnMut(&str) -> bool,
    ) -> Result<(), ShellError> {
        let removed = match kind {
            Kind::Product => self.delete_row::<Product>(id, confirm),
            Kind::Plan => self.delete_row::<InstallmentPlan>(id, confirm),
            Kind::Branch => self.delete_row::<Branch>(id, confirm),
            Kind::Cart => self.delete_row::<Cart>(id, confirm),
            Kind::Query => self.delete_row::<Query>(id, confirm),
        };

        match removed {
            Some(true) => writeln!(out, "deleted {kind} {id}")?,
            Some(false) => writeln!(out, "kept {kind} {id}")?,
            None => writeln!(out, "no {kind} with id {id}")?,
        }

        Ok(())
    }

    // `None` when absent, otherwise whether the row was removed.
    fn delete_row<E: Collection + Render>(
        &mut self,
        id: EntityId,
        confirm: &mut dyn FnMut(&str) -> bool,
    ) -> Option<bool> {
        self.admin.get::<E>(id)?;

        let removed = self.admin.delete::<E>(id, |row| {
            confirm(&format!("Delete {} {}?", E::ENTITY_NAME, row.render()))
        });

        Some(removed.is_some())
    }

    fn upload(&mut self, id: EntityId, path: &Path, out: &mut dyn Write) -> Result<(), ShellError> {
        let mut draft: ProductDraft = self.admin.open(Some(id))?;
        let rules = self.admin.config().images.clone();

        // Oversized files are rejected before their contents are read.
        let size = fs::metadata(path)?.len();
        if size > rules.max_bytes {
            let err = UploadError::TooLarge {
                size,
                max: rules.max_bytes,
            };
            return Err(FormError::from(err).into());
        }

        let upload = ImageUpload::new(mime_for(path), fs::read(path)?);
        if !draft.attach_upload(&upload, &rules).map_err(FormError::from)? {
            writeln!(out, "image already attached")?;
            return Ok(());
        }

        let product = self.admin.save(&draft)?;
        writeln!(out, "updated {}", product.render())?;

        Ok(())
    }
}

///
/// ListFilters
/// Optional `status=` and `since=` filters on a listing.
///

#[derive(Clone, Copy, Debug, Default)]
struct ListFilters<'a> {
    status: Option<&'a str>,
    since: Option<Timestamp>,
}

impl ListFilters<'_> {
    fn reject_status(&self, kind: Kind) -> Result<(), ShellError> {
        if self.status.is_some() {
            return Err(ShellError::UnsupportedFilter {
                kind,
                filter: "status",
            });
        }

        Ok(())
    }

    fn reject_all(&self, kind: Kind) -> Result<(), ShellError> {
        if self.since.is_some() {
            return Err(ShellError::UnsupportedFilter {
                kind,
                filter: "date",
            });
        }

        self.reject_status(kind)
    }
}

fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

///
/// TESTS
///
