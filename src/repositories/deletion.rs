use sqlx::PgPool;

use crate::core::metrics;
use crate::db::schema::{self, Entity};
use crate::errors::DataError;

/// Deletes one row of `entity`, refusing while a protecting relation still has
/// dependents. Cascading dependents are removed by the database in the same
/// statement; a protect reached through a cascade surfaces as a foreign key
/// violation and is reported the same way.
pub(crate) async fn delete_guarded(
    pool: &PgPool,
    entity: Entity,
    key: i64,
) -> Result<(), DataError> {
    let table = entity.table();
    let key_column = entity.key_column();

    let mut tx = pool.begin().await?;

    let locked = sqlx::query_scalar::<_, i64>(&format!(
        "SELECT {key_column} FROM {table} WHERE {key_column} = $1 FOR UPDATE"
    ))
    .bind(key)
    .fetch_optional(&mut *tx)
    .await?;

    if locked.is_none() {
        return Err(DataError::not_found(entity, key));
    }

    for relation in schema::protecting(entity) {
        let referenced = sqlx::query_scalar::<_, bool>(&format!(
            "SELECT EXISTS (SELECT 1 FROM {} WHERE {} = $1)",
            relation.child.table(),
            relation.column
        ))
        .bind(key)
        .fetch_one(&mut *tx)
        .await?;

        if referenced {
            return Err(blocked(entity, key, relation.child));
        }
    }

    let result = sqlx::query(&format!("DELETE FROM {table} WHERE {key_column} = $1"))
        .bind(key)
        .execute(&mut *tx)
        .await;

    if let Err(err) = result {
        return Err(match DataError::on_delete(entity, err) {
            DataError::ReferentialIntegrity { dependent, .. } => blocked(entity, key, dependent),
            other => other,
        });
    }

    tx.commit().await?;

    let cascaded: Vec<&str> = schema::cascading(entity).map(|r| r.child.name()).collect();
    metrics::record_write(entity, "delete");
    tracing::info!(
        entity = %entity,
        key,
        cascaded = ?cascaded,
        action = "delete",
        "Row deleted"
    );

    Ok(())
}

fn blocked(entity: Entity, key: i64, dependent: Entity) -> DataError {
    metrics::record_delete_blocked(entity, dependent);
    tracing::warn!(
        entity = %entity,
        key,
        dependent = %dependent,
        "Delete refused by protected relation"
    );
    DataError::ReferentialIntegrity { entity, dependent }
}
