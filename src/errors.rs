use thiserror::Error;

use crate::core::security::SecurityError;
use crate::db::schema::{self, Entity};

const FOREIGN_KEY_VIOLATION: &str = "23503";
const UNIQUE_VIOLATION: &str = "23505";
const NOT_NULL_VIOLATION: &str = "23502";
const CHECK_VIOLATION: &str = "23514";
const STRING_DATA_RIGHT_TRUNCATION: &str = "22001";

#[derive(Debug, Error)]
pub enum DataError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("cannot delete {entity}: still referenced by {dependent}")]
    ReferentialIntegrity { entity: Entity, dependent: Entity },
    #[error("{entity} not found")]
    NotFound { entity: Entity, key: Option<i64> },
    #[error("{entity} with this {field} already exists")]
    Uniqueness { entity: Entity, field: String },
    #[error(transparent)]
    Password(#[from] SecurityError),
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl DataError {
    pub(crate) fn not_found(entity: Entity, key: i64) -> Self {
        Self::NotFound { entity, key: Some(key) }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Maps a failure raised while deleting `entity`. A foreign key violation
    /// here means a protected dependent, possibly reached through a cascade.
    pub(crate) fn on_delete(entity: Entity, err: sqlx::Error) -> Self {
        classify(err, Some(entity))
    }
}

impl From<sqlx::Error> for DataError {
    fn from(err: sqlx::Error) -> Self {
        classify(err, None)
    }
}

impl From<validator::ValidationErrors> for DataError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

fn classify(err: sqlx::Error, deleting: Option<Entity>) -> DataError {
    let classified = match &err {
        sqlx::Error::Database(db_error) => classify_constraint(
            db_error.code().as_deref(),
            db_error.constraint(),
            db_error.message(),
            deleting,
        ),
        _ => None,
    };
    classified.unwrap_or(DataError::Database(err))
}

fn classify_constraint(
    code: Option<&str>,
    constraint: Option<&str>,
    message: &str,
    deleting: Option<Entity>,
) -> Option<DataError> {
    match code? {
        FOREIGN_KEY_VIOLATION => {
            let relation = schema::relation_for_fk_constraint(constraint?)?;
            Some(match deleting {
                Some(entity) => {
                    DataError::ReferentialIntegrity { entity, dependent: relation.child }
                }
                None => DataError::NotFound { entity: relation.parent, key: None },
            })
        }
        UNIQUE_VIOLATION => {
            let constraint = constraint?;
            let entity = Entity::owning_constraint(constraint)?;
            let field = if constraint.ends_with("_pkey") {
                entity.key_column().to_string()
            } else {
                constraint
                    .strip_prefix(entity.table())
                    .and_then(|rest| rest.strip_prefix('_'))
                    .and_then(|rest| rest.strip_suffix("_key"))
                    .unwrap_or(constraint)
                    .to_string()
            };
            Some(DataError::Uniqueness { entity, field })
        }
        NOT_NULL_VIOLATION | CHECK_VIOLATION | STRING_DATA_RIGHT_TRUNCATION => {
            Some(DataError::Validation(message.to_string()))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fk_violation_on_write_is_missing_parent() {
        let err = classify_constraint(
            Some(FOREIGN_KEY_VIOLATION),
            Some("assignment_results_assignment_id_fkey"),
            "insert or update on table \"assignment_results\" violates foreign key constraint",
            None,
        );
        assert!(matches!(err, Some(DataError::NotFound { entity: Entity::Assignment, key: None })));
    }

    #[test]
    fn fk_violation_on_delete_names_the_dependent() {
        let err = classify_constraint(
            Some(FOREIGN_KEY_VIOLATION),
            Some("courses_instructor_id_fkey"),
            "update or delete on table \"instructors\" violates foreign key constraint",
            Some(Entity::Instructor),
        );
        assert!(matches!(
            err,
            Some(DataError::ReferentialIntegrity {
                entity: Entity::Instructor,
                dependent: Entity::Course
            })
        ));
    }

    #[test]
    fn nested_protect_reports_the_entity_being_deleted() {
        let err = classify_constraint(
            Some(FOREIGN_KEY_VIOLATION),
            Some("assignment_results_assignment_id_fkey"),
            "update or delete on table \"assignments\" violates foreign key constraint",
            Some(Entity::Course),
        );
        assert!(matches!(
            err,
            Some(DataError::ReferentialIntegrity {
                entity: Entity::Course,
                dependent: Entity::AssignmentResult
            })
        ));
    }

    #[test]
    fn unique_violations_name_the_field() {
        match classify_constraint(Some(UNIQUE_VIOLATION), Some("instructors_email_key"), "", None)
        {
            Some(DataError::Uniqueness { entity, field }) => {
                assert_eq!(entity, Entity::Instructor);
                assert_eq!(field, "email");
            }
            other => panic!("unexpected: {other:?}"),
        }

        match classify_constraint(Some(UNIQUE_VIOLATION), Some("lessons_pkey"), "", None) {
            Some(DataError::Uniqueness { entity, field }) => {
                assert_eq!(entity, Entity::Lesson);
                assert_eq!(field, "course_id");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn check_violation_is_validation() {
        let err = classify_constraint(
            Some(CHECK_VIOLATION),
            Some("payments_payment_status_check"),
            "new row violates check constraint",
            None,
        );
        assert!(matches!(err, Some(DataError::Validation(_))));
    }

    #[test]
    fn unknown_codes_and_constraints_fall_through() {
        assert!(classify_constraint(Some("40001"), None, "serialization failure", None).is_none());
        assert!(classify_constraint(Some(FOREIGN_KEY_VIOLATION), Some("other_fkey"), "", None)
            .is_none());
        assert!(classify_constraint(None, None, "", None).is_none());
    }

    #[test]
    fn non_database_errors_stay_database_errors() {
        let err: DataError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, DataError::Database(sqlx::Error::RowNotFound)));
    }
}
