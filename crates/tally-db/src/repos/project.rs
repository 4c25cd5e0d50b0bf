//! Project repository: CRUD, status transitions, expenses and site detail.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tally_core::audit_detail::StatusChangedDetail;
use tally_core::entities::Project;
use tally_core::enums::{AuditAction, EntityType, ProjectStatus};
use tally_core::errors::CoreError;
use tally_core::ids::PREFIX_PROJECT;
use tally_core::responses::{
    ProjectDetail, ProjectExpenseLine, ProjectExpensesResponse, ProjectStatusCounts,
};

use crate::error::DatabaseError;
use crate::helpers::{
    get_opt_string, parse_datetime, parse_decimal, parse_enum, parse_optional_date, to_detail,
};
use crate::repos::audit;
use crate::repos::tool::{self, MOVEMENT_COLS, row_to_movement, row_to_tool};
use crate::service::{TallyService, finish};
use crate::updates::project::ProjectUpdate;

pub(crate) const SELECT_COLS: &str =
    "id, name, description, status, start_date, end_date, created_at, updated_at";

pub(crate) fn row_to_project(row: &libsql::Row) -> Result<Project, DatabaseError> {
    Ok(Project {
        id: row.get(0)?,
        name: row.get(1)?,
        description: get_opt_string(row, 2)?,
        status: parse_enum(&row.get::<String>(3)?)?,
        start_date: parse_optional_date(get_opt_string(row, 4)?.as_deref())?,
        end_date: parse_optional_date(get_opt_string(row, 5)?.as_deref())?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
        updated_at: parse_datetime(&row.get::<String>(7)?)?,
    })
}

pub(crate) async fn fetch_project(
    conn: &libsql::Connection,
    id: &str,
) -> Result<Project, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {SELECT_COLS} FROM projects WHERE id = ?1"),
            [id],
        )
        .await?;
    let row = rows
        .next()
        .await?
        .ok_or_else(|| DatabaseError::not_found("project", id))?;
    row_to_project(&row)
}

fn validate_dates(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<(), DatabaseError> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => Err(DatabaseError::validation(format!(
            "project end date {end} is before start date {start}"
        ))),
        _ => Ok(()),
    }
}

fn date_value(date: Option<NaiveDate>) -> libsql::Value {
    date.map_or(libsql::Value::Null, |d| libsql::Value::Text(d.to_string()))
}

impl TallyService {
    pub async fn create_project(
        &self,
        name: &str,
        description: Option<&str>,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        actor: &str,
    ) -> Result<Project, DatabaseError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DatabaseError::validation("project name cannot be empty"));
        }
        validate_dates(start_date, end_date)?;

        let id = self.db().generate_id(PREFIX_PROJECT).await?;
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO projects ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"
        );
        self.db()
            .execute_with(&sql, || {
                libsql::params![
                    id.as_str(),
                    name,
                    description,
                    ProjectStatus::Active.as_str(),
                    date_value(start_date),
                    date_value(end_date),
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ]
            })
            .await?;

        self.audit(actor, EntityType::Project, &id, AuditAction::Created, None)
            .await?;
        tracing::debug!(id = %id, name, "project created");

        Ok(Project {
            id,
            name: name.to_string(),
            description: description.map(String::from),
            status: ProjectStatus::Active,
            start_date,
            end_date,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn get_project(&self, id: &str) -> Result<Project, DatabaseError> {
        let mut rows = self
            .db()
            .query_with(
                &format!("SELECT {SELECT_COLS} FROM projects WHERE id = ?1"),
                || [id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found("project", id))?;
        row_to_project(&row)
    }

    pub async fn resolve_project(&self, id_or_name: &str) -> Result<Project, DatabaseError> {
        let mut rows = self
            .db()
            .query_with(
                &format!("SELECT {SELECT_COLS} FROM projects WHERE id = ?1 OR name = ?1 LIMIT 1"),
                || [id_or_name],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found("project", id_or_name))?;
        row_to_project(&row)
    }

    pub async fn update_project(
        &self,
        project_id: &str,
        update: ProjectUpdate,
        actor: &str,
    ) -> Result<Project, DatabaseError> {
        let tx = self.begin().await?;
        let result = update_project_in(&tx, project_id, &update, actor).await;
        finish(tx, result).await
    }

    pub async fn delete_project(&self, project_id: &str, actor: &str) -> Result<(), DatabaseError> {
        let changed = self
            .db()
            .execute_with("DELETE FROM projects WHERE id = ?1", || [project_id])
            .await?;
        if changed == 0 {
            return Err(DatabaseError::not_found("project", project_id));
        }
        self.audit(actor, EntityType::Project, project_id, AuditAction::Deleted, None)
            .await?;
        tracing::debug!(id = %project_id, "project deleted");
        Ok(())
    }

    pub async fn list_projects(
        &self,
        status: Option<ProjectStatus>,
        limit: Option<u32>,
    ) -> Result<Vec<Project>, DatabaseError> {
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut sql = format!("SELECT {SELECT_COLS} FROM projects");
        if let Some(status) = status {
            params.push(libsql::Value::Text(status.as_str().to_string()));
            sql.push_str(" WHERE status = ?1");
        }
        sql.push_str(" ORDER BY created_at DESC, rowid DESC");
        if let Some(limit) = limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        let mut rows = self
            .db()
            .query_with(&sql, || libsql::params_from_iter(params.clone()))
            .await?;
        let mut projects = Vec::new();
        while let Some(row) = rows.next().await? {
            projects.push(row_to_project(&row)?);
        }
        Ok(projects)
    }

    pub async fn transition_project(
        &self,
        project_id: &str,
        next: ProjectStatus,
        actor: &str,
    ) -> Result<Project, DatabaseError> {
        let mut project = self.get_project(project_id).await?;
        if !project.status.can_transition_to(next) {
            return Err(CoreError::InvalidTransition {
                entity_type: EntityType::Project.to_string(),
                id: project.id.clone(),
                from: project.status.to_string(),
                to: next.to_string(),
            }
            .into());
        }

        let now = Utc::now();
        self.db()
            .execute_with(
                "UPDATE projects SET status = ?1, updated_at = ?2 WHERE id = ?3",
                || libsql::params![next.as_str(), now.to_rfc3339(), project_id],
            )
            .await?;

        let detail = StatusChangedDetail {
            from: project.status.to_string(),
            to: next.to_string(),
            reason: None,
        };
        self.audit(
            actor,
            EntityType::Project,
            project_id,
            AuditAction::StatusChanged,
            Some(to_detail(&detail)?),
        )
        .await?;
        tracing::debug!(id = %project_id, from = %project.status, to = %next, "project status changed");

        project.status = next;
        project.updated_at = now;
        Ok(project)
    }

    pub async fn project_expenses(
        &self,
        project_id: &str,
    ) -> Result<ProjectExpensesResponse, DatabaseError> {
        self.get_project(project_id).await?;

        let mut rows = self
            .db()
            .query_with(
                "SELECT t.id, i.name, i.sku, t.quantity, t.total_cost, t.created_at
                 FROM inventory_transactions t
                 JOIN inventory_items i ON i.id = t.item_id
                 WHERE t.project_id = ?1 AND t.transaction_type IN ('checkout', 'withdraw')
                 ORDER BY t.created_at DESC, t.rowid DESC",
                || [project_id],
            )
            .await?;

        let mut lines = Vec::new();
        while let Some(row) = rows.next().await? {
            lines.push(ProjectExpenseLine {
                transaction_id: row.get(0)?,
                item_name: row.get(1)?,
                item_sku: row.get(2)?,
                quantity: row.get(3)?,
                total_cost: parse_decimal(&row.get::<String>(4)?)?,
                created_at: parse_datetime(&row.get::<String>(5)?)?,
            });
        }
        let total_cost = lines.iter().map(|l| l.total_cost).sum::<Decimal>();

        Ok(ProjectExpensesResponse {
            project_id: project_id.to_string(),
            lines,
            total_cost,
        })
    }

    pub async fn project_detail(&self, project_id: &str) -> Result<ProjectDetail, DatabaseError> {
        let project = self.get_project(project_id).await?;

        let mut rows = self
            .db()
            .query_with(
                &format!(
                    "SELECT {} FROM tools WHERE location = ?1 ORDER BY name COLLATE NOCASE",
                    tool::SELECT_COLS
                ),
                || [project.name.as_str()],
            )
            .await?;
        let mut current_tools = Vec::new();
        while let Some(row) = rows.next().await? {
            current_tools.push(row_to_tool(&row)?);
        }

        let mut rows = self
            .db()
            .query_with(
                &format!(
                    "SELECT {MOVEMENT_COLS} FROM tool_movements
                     WHERE from_location = ?1 OR to_location = ?1
                     ORDER BY moved_at DESC, rowid DESC"
                ),
                || [project.name.as_str()],
            )
            .await?;
        let mut tool_movements = Vec::new();
        while let Some(row) = rows.next().await? {
            tool_movements.push(row_to_movement(&row)?);
        }

        let expenses = self.project_expenses(project_id).await?;
        Ok(ProjectDetail {
            project,
            current_tools,
            tool_movements,
            expenses,
        })
    }

    pub async fn project_status_counts(&self) -> Result<ProjectStatusCounts, DatabaseError> {
        let mut rows = self
            .db()
            .query_with("SELECT status FROM projects", || ())
            .await?;
        let mut counts = ProjectStatusCounts::default();
        while let Some(row) = rows.next().await? {
            counts.add(parse_enum(&row.get::<String>(0)?)?);
        }
        Ok(counts)
    }
}

async fn update_project_in(
    conn: &libsql::Connection,
    project_id: &str,
    update: &ProjectUpdate,
    actor: &str,
) -> Result<Project, DatabaseError> {
    let current = fetch_project(conn, project_id).await?;

    let name = match update.name.as_deref().map(str::trim) {
        Some("") => return Err(DatabaseError::validation("project name cannot be empty")),
        Some(name) => name.to_string(),
        None => current.name.clone(),
    };
    let description = update
        .description
        .clone()
        .unwrap_or_else(|| current.description.clone());
    let start_date = update.start_date.unwrap_or(current.start_date);
    let end_date = update.end_date.unwrap_or(current.end_date);
    validate_dates(start_date, end_date)?;

    let now = Utc::now();
    conn.execute(
        "UPDATE projects
         SET name = ?1, description = ?2, start_date = ?3, end_date = ?4, updated_at = ?5
         WHERE id = ?6",
        libsql::params![
            name.as_str(),
            description.as_deref(),
            date_value(start_date),
            date_value(end_date),
            now.to_rfc3339(),
            project_id
        ],
    )
    .await?;

    if name != current.name {
        let moved = conn
            .execute(
                "UPDATE tools SET location = ?1, updated_at = ?2 WHERE location = ?3",
                libsql::params![name.as_str(), now.to_rfc3339(), current.name.as_str()],
            )
            .await?;
        tracing::debug!(from = %current.name, to = %name, tools = moved, "project renamed");
    }

    audit::record(
        conn,
        actor,
        EntityType::Project,
        project_id,
        AuditAction::Updated,
        Some(to_detail(update)?),
    )
    .await?;

    Ok(Project {
        name,
        description,
        start_date,
        end_date,
        updated_at: now,
        ..current
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::audit::AuditFilter;
    use crate::repos::tool::NewTool;
    use crate::test_support::helpers::{ACTOR, seed_item, seed_project, test_service};
    use crate::updates::project::ProjectUpdateBuilder;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn create_and_fetch_project() {
        let svc = test_service().await;
        let project = svc
            .create_project(
                "Smith House",
                Some("Exterior repaint"),
                Some(date(2026, 5, 1)),
                Some(date(2026, 5, 20)),
                ACTOR,
            )
            .await
            .unwrap();

        assert!(project.id.starts_with("prj-"));
        assert_eq!(project.status, ProjectStatus::Active);
        let fetched = svc.get_project(&project.id).await.unwrap();
        assert_eq!(fetched.name, "Smith House");
        assert_eq!(fetched.start_date, Some(date(2026, 5, 1)));
        assert_eq!(svc.resolve_project("Smith House").await.unwrap().id, project.id);
    }

    #[tokio::test]
    async fn rejects_blank_name_and_inverted_dates() {
        let svc = test_service().await;
        let blank = svc.create_project("  ", None, None, None, ACTOR).await;
        assert!(matches!(blank, Err(DatabaseError::Core(CoreError::Validation(_)))));

        let inverted = svc
            .create_project(
                "Jones Office",
                None,
                Some(date(2026, 6, 10)),
                Some(date(2026, 6, 1)),
                ACTOR,
            )
            .await;
        assert!(matches!(inverted, Err(DatabaseError::Core(CoreError::Validation(_)))));
    }

    #[tokio::test]
    async fn transitions_follow_state_machine() {
        let svc = test_service().await;
        let project = seed_project(&svc, "Smith House").await;

        let done = svc
            .transition_project(&project.id, ProjectStatus::Completed, ACTOR)
            .await
            .unwrap();
        assert_eq!(done.status, ProjectStatus::Completed);

        let archived = svc
            .transition_project(&project.id, ProjectStatus::Archived, ACTOR)
            .await
            .unwrap();
        assert_eq!(archived.status, ProjectStatus::Archived);

        let invalid = svc
            .transition_project(&project.id, ProjectStatus::Completed, ACTOR)
            .await;
        assert!(matches!(
            invalid,
            Err(DatabaseError::Core(CoreError::InvalidTransition { .. }))
        ));

        let entries = svc
            .query_audit(&AuditFilter {
                entity_id: Some(project.id.clone()),
                action: Some(AuditAction::StatusChanged),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[tokio::test]
    async fn list_and_count_by_status() {
        let svc = test_service().await;
        let a = seed_project(&svc, "Smith House").await;
        seed_project(&svc, "Jones Office").await;
        seed_project(&svc, "Lee Porch").await;
        svc.transition_project(&a.id, ProjectStatus::Completed, ACTOR)
            .await
            .unwrap();

        let all = svc.list_projects(None, None).await.unwrap();
        let names: Vec<&str> = all.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Lee Porch", "Jones Office", "Smith House"]);

        let active = svc
            .list_projects(Some(ProjectStatus::Active), Some(1))
            .await
            .unwrap();
        assert_eq!(active.len(), 1);

        let counts = svc.project_status_counts().await.unwrap();
        assert_eq!(
            counts,
            ProjectStatusCounts {
                all: 3,
                active: 2,
                completed: 1,
                archived: 0,
            }
        );
    }

    #[tokio::test]
    async fn rename_carries_site_tools() {
        let svc = test_service().await;
        let project = seed_project(&svc, "Smith House").await;
        let ladder = svc
            .create_tool(
                &NewTool {
                    name: "Extension Ladder".into(),
                    ..NewTool::default()
                },
                ACTOR,
            )
            .await
            .unwrap();
        svc.move_tool(&ladder.id, "Smith House", None, ACTOR)
            .await
            .unwrap();

        let renamed = svc
            .update_project(
                &project.id,
                ProjectUpdateBuilder::new()
                    .name("Smith Residence")
                    .end_date(Some(date(2026, 7, 1)))
                    .build(),
                ACTOR,
            )
            .await
            .unwrap();
        assert_eq!(renamed.name, "Smith Residence");
        assert_eq!(renamed.end_date, Some(date(2026, 7, 1)));

        let tool = svc.get_tool(&ladder.id).await.unwrap();
        assert_eq!(tool.location, "Smith Residence");
    }

    #[tokio::test]
    async fn expenses_and_detail() {
        let svc = test_service().await;
        let paint = seed_item(&svc, "Eggshell White", "PNT-EW", 10, 2, 3250).await;
        let project = seed_project(&svc, "Smith House").await;
        svc.checkout(&project.id, &[(paint.id.clone(), 2)], None, ACTOR)
            .await
            .unwrap();

        let sprayer = svc
            .create_tool(
                &NewTool {
                    name: "Airless Sprayer".into(),
                    ..NewTool::default()
                },
                ACTOR,
            )
            .await
            .unwrap();
        svc.move_tool(&sprayer.id, "Smith House", None, ACTOR)
            .await
            .unwrap();

        let detail = svc.project_detail(&project.id).await.unwrap();
        assert_eq!(detail.current_tools.len(), 1);
        assert_eq!(detail.tool_movements.len(), 1);
        assert_eq!(detail.expenses.lines.len(), 1);
        assert_eq!(detail.expenses.lines[0].item_sku, "PNT-EW");
        assert_eq!(detail.expenses.total_cost, Decimal::new(6500, 2));
    }

    #[tokio::test]
    async fn delete_keeps_ledger_history() {
        let svc = test_service().await;
        let paint = seed_item(&svc, "Eggshell White", "PNT-EW", 10, 2, 3250).await;
        let project = seed_project(&svc, "Smith House").await;
        let cart = svc
            .checkout(&project.id, &[(paint.id.clone(), 1)], None, ACTOR)
            .await
            .unwrap();

        svc.delete_project(&project.id, ACTOR).await.unwrap();
        let txn = svc
            .get_transaction(&cart.transactions[0].id)
            .await
            .unwrap();
        assert_eq!(txn.project_id, None);
        assert!(svc.delete_project(&project.id, ACTOR).await.is_err());
    }
}
