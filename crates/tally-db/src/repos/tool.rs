//! Tool repository: CRUD, filtering, moves between locations and history.

use chrono::Utc;
use tally_core::audit_detail::MovedDetail;
use tally_core::entities::{Tool, ToolMovement};
use tally_core::enums::{AuditAction, EntityType, MovementType, ToolStatus};
use tally_core::ids::{PREFIX_MOVEMENT, PREFIX_TOOL};
use tally_core::responses::ToolMoveResponse;

use crate::error::DatabaseError;
use crate::generate_id_on;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum, to_detail};
use crate::repos::audit;
use crate::service::{TallyService, finish};
use crate::updates::tool::ToolUpdate;

pub(crate) const SELECT_COLS: &str =
    "id, name, sku, description, tool_type, location, status, created_at, updated_at";

pub(crate) const MOVEMENT_COLS: &str =
    "id, tool_id, project_id, from_location, to_location, movement_type, notes, moved_by, moved_at";

pub(crate) fn row_to_tool(row: &libsql::Row) -> Result<Tool, DatabaseError> {
    Ok(Tool {
        id: row.get(0)?,
        name: row.get(1)?,
        sku: get_opt_string(row, 2)?,
        description: get_opt_string(row, 3)?,
        tool_type: get_opt_string(row, 4)?,
        location: row.get(5)?,
        status: parse_enum(&row.get::<String>(6)?)?,
        created_at: parse_datetime(&row.get::<String>(7)?)?,
        updated_at: parse_datetime(&row.get::<String>(8)?)?,
    })
}

pub(crate) fn row_to_movement(row: &libsql::Row) -> Result<ToolMovement, DatabaseError> {
    Ok(ToolMovement {
        id: row.get(0)?,
        tool_id: row.get(1)?,
        project_id: get_opt_string(row, 2)?,
        from_location: row.get(3)?,
        to_location: row.get(4)?,
        movement_type: parse_enum(&row.get::<String>(5)?)?,
        notes: get_opt_string(row, 6)?,
        moved_by: row.get(7)?,
        moved_at: parse_datetime(&row.get::<String>(8)?)?,
    })
}

/// Fields for a new tool. New tools start in the shop.
#[derive(Debug, Clone)]
pub struct NewTool {
    pub name: String,
    pub sku: Option<String>,
    pub description: Option<String>,
    pub tool_type: Option<String>,
    pub status: ToolStatus,
}

impl Default for NewTool {
    fn default() -> Self {
        Self {
            name: String::new(),
            sku: None,
            description: None,
            tool_type: None,
            status: ToolStatus::Available,
        }
    }
}

/// Filter criteria for tool listings.
#[derive(Debug, Default)]
pub struct ToolFilter {
    pub search: Option<String>,
    pub location: Option<String>,
    pub status: Option<ToolStatus>,
    pub tool_type: Option<String>,
    pub limit: Option<u32>,
}

async fn fetch_tool(conn: &libsql::Connection, id: &str) -> Result<Tool, DatabaseError> {
    let mut rows = conn
        .query(&format!("SELECT {SELECT_COLS} FROM tools WHERE id = ?1"), [id])
        .await?;
    let row = rows
        .next()
        .await?
        .ok_or_else(|| DatabaseError::not_found("tool", id))?;
    row_to_tool(&row)
}

impl TallyService {
    pub async fn create_tool(&self, new: &NewTool, actor: &str) -> Result<Tool, DatabaseError> {
        let name = new.name.trim();
        if name.is_empty() {
            return Err(DatabaseError::validation("tool name cannot be empty"));
        }

        let id = self.db().generate_id(PREFIX_TOOL).await?;
        let now = Utc::now();
        let location = self.shop_location().to_string();
        let sql = format!(
            "INSERT INTO tools ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
        );
        self.db()
            .execute_with(&sql, || {
                libsql::params![
                    id.as_str(),
                    name,
                    new.sku.as_deref(),
                    new.description.as_deref(),
                    new.tool_type.as_deref(),
                    location.as_str(),
                    new.status.as_str(),
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ]
            })
            .await?;

        self.audit(actor, EntityType::Tool, &id, AuditAction::Created, None)
            .await?;
        tracing::debug!(id = %id, name, "tool created");

        Ok(Tool {
            id,
            name: name.to_string(),
            sku: new.sku.clone(),
            description: new.description.clone(),
            tool_type: new.tool_type.clone(),
            location,
            status: new.status,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn get_tool(&self, id: &str) -> Result<Tool, DatabaseError> {
        let mut rows = self
            .db()
            .query_with(
                &format!("SELECT {SELECT_COLS} FROM tools WHERE id = ?1"),
                || [id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found("tool", id))?;
        row_to_tool(&row)
    }

    pub async fn update_tool(
        &self,
        tool_id: &str,
        update: ToolUpdate,
        actor: &str,
    ) -> Result<Tool, DatabaseError> {
        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1usize;

        if let Some(ref name) = update.name {
            if name.trim().is_empty() {
                return Err(DatabaseError::validation("tool name cannot be empty"));
            }
            sets.push(format!("name = ?{idx}"));
            params.push(name.trim().into());
            idx += 1;
        }
        if let Some(ref sku) = update.sku {
            sets.push(format!("sku = ?{idx}"));
            params.push(sku.clone().map_or(libsql::Value::Null, Into::into));
            idx += 1;
        }
        if let Some(ref description) = update.description {
            sets.push(format!("description = ?{idx}"));
            params.push(description.clone().map_or(libsql::Value::Null, Into::into));
            idx += 1;
        }
        if let Some(ref tool_type) = update.tool_type {
            sets.push(format!("tool_type = ?{idx}"));
            params.push(tool_type.clone().map_or(libsql::Value::Null, Into::into));
            idx += 1;
        }
        if let Some(status) = update.status {
            sets.push(format!("status = ?{idx}"));
            params.push(status.as_str().into());
            idx += 1;
        }

        if sets.is_empty() {
            return self.get_tool(tool_id).await;
        }

        sets.push(format!("updated_at = ?{idx}"));
        params.push(Utc::now().to_rfc3339().into());
        idx += 1;

        params.push(tool_id.into());
        let sql = format!("UPDATE tools SET {} WHERE id = ?{idx}", sets.join(", "));
        let changed = self
            .db()
            .execute_with(&sql, || libsql::params_from_iter(params.clone()))
            .await?;
        if changed == 0 {
            return Err(DatabaseError::not_found("tool", tool_id));
        }

        let updated = self.get_tool(tool_id).await?;
        self.audit(
            actor,
            EntityType::Tool,
            tool_id,
            AuditAction::Updated,
            Some(to_detail(&update)?),
        )
        .await?;
        Ok(updated)
    }

    /// Delete a tool and its movement history.
    pub async fn delete_tool(&self, tool_id: &str, actor: &str) -> Result<(), DatabaseError> {
        let changed = self
            .db()
            .execute_with("DELETE FROM tools WHERE id = ?1", || [tool_id])
            .await?;
        if changed == 0 {
            return Err(DatabaseError::not_found("tool", tool_id));
        }
        self.audit(actor, EntityType::Tool, tool_id, AuditAction::Deleted, None)
            .await?;
        tracing::debug!(id = %tool_id, "tool deleted");
        Ok(())
    }

    /// List tools ordered by name.
    pub async fn list_tools(&self, filter: &ToolFilter) -> Result<Vec<Tool>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(ref location) = filter.location {
            params.push(libsql::Value::Text(location.clone()));
            conditions.push(format!("location = ?{}", params.len()));
        }
        if let Some(status) = filter.status {
            params.push(libsql::Value::Text(status.as_str().to_string()));
            conditions.push(format!("status = ?{}", params.len()));
        }
        if let Some(ref tool_type) = filter.tool_type {
            params.push(libsql::Value::Text(tool_type.clone()));
            conditions.push(format!("tool_type = ?{}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let sql = format!("SELECT {SELECT_COLS} FROM tools {where_clause} ORDER BY name COLLATE NOCASE");

        let mut rows = self
            .db()
            .query_with(&sql, || libsql::params_from_iter(params.clone()))
            .await?;
        let search = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let limit = filter.limit.map_or(usize::MAX, |l| l as usize);

        let mut tools = Vec::new();
        while let Some(row) = rows.next().await? {
            let tool = row_to_tool(&row)?;
            if search.is_none_or(|term| tool.matches_search(term)) {
                tools.push(tool);
            }
            if tools.len() >= limit {
                break;
            }
        }
        Ok(tools)
    }

    /// Move a tool and record the movement.
    ///
    /// Returning to the shop frees the tool, leaving it puts it in use. A
    /// destination that names a project links the movement to it.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank destination or a move to the
    /// tool's current location.
    pub async fn move_tool(
        &self,
        tool_id: &str,
        to_location: &str,
        notes: Option<&str>,
        actor: &str,
    ) -> Result<ToolMoveResponse, DatabaseError> {
        let to_location = to_location.trim();
        if to_location.is_empty() {
            return Err(DatabaseError::validation("destination cannot be empty"));
        }

        let tx = self.begin().await?;
        let result = move_tool_in(&tx, self.shop_location(), tool_id, to_location, notes, actor).await;
        let response = finish(tx, result).await?;
        tracing::debug!(
            tool = %tool_id,
            from = %response.movement.from_location,
            to = %response.movement.to_location,
            kind = %response.movement.movement_type,
            "tool moved"
        );
        Ok(response)
    }

    /// Movements of one tool, newest first.
    pub async fn tool_history(&self, tool_id: &str) -> Result<Vec<ToolMovement>, DatabaseError> {
        self.get_tool(tool_id).await?;
        let mut rows = self
            .db()
            .query_with(
                &format!(
                    "SELECT {MOVEMENT_COLS} FROM tool_movements WHERE tool_id = ?1
                     ORDER BY moved_at DESC, rowid DESC"
                ),
                || [tool_id],
            )
            .await?;
        let mut movements = Vec::new();
        while let Some(row) = rows.next().await? {
            movements.push(row_to_movement(&row)?);
        }
        Ok(movements)
    }

    /// Places a tool can go: the shop first, then active projects by name.
    pub async fn location_options(&self) -> Result<Vec<String>, DatabaseError> {
        let mut rows = self
            .db()
            .query_with(
                "SELECT name FROM projects WHERE status = 'active' ORDER BY name COLLATE NOCASE",
                || (),
            )
            .await?;
        let mut locations = vec![self.shop_location().to_string()];
        while let Some(row) = rows.next().await? {
            let name: String = row.get(0)?;
            if name != self.shop_location() {
                locations.push(name);
            }
        }
        Ok(locations)
    }
}

async fn move_tool_in(
    conn: &libsql::Connection,
    shop: &str,
    tool_id: &str,
    to_location: &str,
    notes: Option<&str>,
    actor: &str,
) -> Result<ToolMoveResponse, DatabaseError> {
    let mut tool = fetch_tool(conn, tool_id).await?;
    if tool.location == to_location {
        return Err(DatabaseError::validation(format!(
            "{} is already at {to_location}",
            tool.name
        )));
    }

    let movement_type = MovementType::classify(&tool.location, to_location, shop);
    let status = movement_type.resulting_status();

    let mut rows = conn
        .query("SELECT id FROM projects WHERE name = ?1", [to_location])
        .await?;
    let project_id: Option<String> = match rows.next().await? {
        Some(row) => Some(row.get(0)?),
        None => None,
    };
    drop(rows);

    let now = Utc::now();
    let movement = ToolMovement {
        id: generate_id_on(conn, PREFIX_MOVEMENT).await?,
        tool_id: tool.id.clone(),
        project_id,
        from_location: tool.location.clone(),
        to_location: to_location.to_string(),
        movement_type,
        notes: notes.map(String::from),
        moved_by: actor.to_string(),
        moved_at: now,
    };

    conn.execute(
        &format!(
            "INSERT INTO tool_movements ({MOVEMENT_COLS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
        ),
        libsql::params![
            movement.id.as_str(),
            movement.tool_id.as_str(),
            movement.project_id.as_deref(),
            movement.from_location.as_str(),
            movement.to_location.as_str(),
            movement_type.as_str(),
            movement.notes.as_deref(),
            actor,
            now.to_rfc3339()
        ],
    )
    .await?;

    conn.execute(
        "UPDATE tools SET location = ?1, status = ?2, updated_at = ?3 WHERE id = ?4",
        libsql::params![to_location, status.as_str(), now.to_rfc3339(), tool.id.as_str()],
    )
    .await?;

    let detail = MovedDetail {
        from_location: movement.from_location.clone(),
        to_location: movement.to_location.clone(),
        movement_id: movement.id.clone(),
    };
    audit::record(
        conn,
        actor,
        EntityType::Tool,
        &tool.id,
        AuditAction::Moved,
        Some(to_detail(&detail)?),
    )
    .await?;

    tool.location = to_location.to_string();
    tool.status = status;
    tool.updated_at = now;
    Ok(ToolMoveResponse { tool, movement })
}
