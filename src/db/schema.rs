//! Entity catalogue and the foreign-key delete policy matrix.
//!
//! `RELATIONS` is the single description of how rows depend on each other. The
//! migration declares the same foreign keys at the database level; guarded
//! deletes consult the matrix first so callers get a typed error that names the
//! blocking relation, and database errors are mapped back through it.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Entity {
    User,
    Instructor,
    Student,
    Category,
    Course,
    Lesson,
    Assignment,
    Question,
    Quiz,
    Exam,
    QuizResult,
    AssignmentResult,
    Cart,
    CartCourse,
    Track,
    Certificate,
    Grade,
    Payment,
}

impl Entity {
    pub const ALL: [Entity; 18] = [
        Entity::User,
        Entity::Instructor,
        Entity::Student,
        Entity::Category,
        Entity::Course,
        Entity::Lesson,
        Entity::Assignment,
        Entity::Question,
        Entity::Quiz,
        Entity::Exam,
        Entity::QuizResult,
        Entity::AssignmentResult,
        Entity::Cart,
        Entity::CartCourse,
        Entity::Track,
        Entity::Certificate,
        Entity::Grade,
        Entity::Payment,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Entity::User => "User",
            Entity::Instructor => "Instructor",
            Entity::Student => "Student",
            Entity::Category => "Category",
            Entity::Course => "Course",
            Entity::Lesson => "Lesson",
            Entity::Assignment => "Assignment",
            Entity::Question => "Question",
            Entity::Quiz => "Quiz",
            Entity::Exam => "Exam",
            Entity::QuizResult => "QuizResult",
            Entity::AssignmentResult => "AssignmentResult",
            Entity::Cart => "Cart",
            Entity::CartCourse => "CartCourse",
            Entity::Track => "Track",
            Entity::Certificate => "Certificate",
            Entity::Grade => "Grade",
            Entity::Payment => "Payment",
        }
    }

    pub fn table(self) -> &'static str {
        match self {
            Entity::User => "users",
            Entity::Instructor => "instructors",
            Entity::Student => "students",
            Entity::Category => "categories",
            Entity::Course => "courses",
            Entity::Lesson => "lessons",
            Entity::Assignment => "assignments",
            Entity::Question => "questions",
            Entity::Quiz => "quizzes",
            Entity::Exam => "exams",
            Entity::QuizResult => "quiz_results",
            Entity::AssignmentResult => "assignment_results",
            Entity::Cart => "carts",
            Entity::CartCourse => "cart_courses",
            Entity::Track => "tracks",
            Entity::Certificate => "certificates",
            Entity::Grade => "grades",
            Entity::Payment => "payments",
        }
    }

    /// Primary key column. Keyed one-to-one entities use their parent's id.
    pub fn key_column(self) -> &'static str {
        match self {
            Entity::Student => "user_id",
            Entity::Lesson | Entity::Assignment | Entity::Exam => "course_id",
            Entity::Quiz => "lesson_id",
            Entity::QuizResult => "quiz_id",
            _ => "id",
        }
    }

    /// Resolves the entity owning a constraint such as `quiz_results_pkey`.
    pub(crate) fn owning_constraint(constraint: &str) -> Option<Entity> {
        Entity::ALL
            .into_iter()
            .filter(|entity| {
                constraint
                    .strip_prefix(entity.table())
                    .is_some_and(|rest| rest.starts_with('_'))
            })
            .max_by_key(|entity| entity.table().len())
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnDelete {
    Cascade,
    Protect,
}

impl OnDelete {
    pub fn sql(self) -> &'static str {
        match self {
            OnDelete::Cascade => "CASCADE",
            OnDelete::Protect => "RESTRICT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// The dependent's primary key is the parent's key.
    OneToOneKeyed,
    /// Unique foreign key on a dependent with its own key.
    OneToOne,
    ManyToOne,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relation {
    pub child: Entity,
    pub column: &'static str,
    pub parent: Entity,
    pub cardinality: Cardinality,
    pub on_delete: OnDelete,
}

impl Relation {
    const fn new(
        child: Entity,
        column: &'static str,
        parent: Entity,
        cardinality: Cardinality,
        on_delete: OnDelete,
    ) -> Self {
        Self { child, column, parent, cardinality, on_delete }
    }

    fn matches_fk_constraint(&self, constraint: &str) -> bool {
        constraint
            .strip_prefix(self.child.table())
            .and_then(|rest| rest.strip_prefix('_'))
            .and_then(|rest| rest.strip_suffix("_fkey"))
            == Some(self.column)
    }
}

use Cardinality::{ManyToOne, OneToOne, OneToOneKeyed};
use OnDelete::{Cascade, Protect};

pub const RELATIONS: &[Relation] = &[
    Relation::new(Entity::Instructor, "user_id", Entity::User, OneToOne, Cascade),
    Relation::new(Entity::Student, "user_id", Entity::User, OneToOneKeyed, Cascade),
    Relation::new(Entity::Course, "instructor_id", Entity::Instructor, OneToOne, Protect),
    Relation::new(Entity::Course, "category_id", Entity::Category, ManyToOne, Protect),
    Relation::new(Entity::Lesson, "course_id", Entity::Course, OneToOneKeyed, Cascade),
    Relation::new(Entity::Assignment, "course_id", Entity::Course, OneToOneKeyed, Cascade),
    Relation::new(Entity::Quiz, "lesson_id", Entity::Lesson, OneToOneKeyed, Cascade),
    Relation::new(Entity::Quiz, "question_id", Entity::Question, ManyToOne, Cascade),
    Relation::new(Entity::Exam, "course_id", Entity::Course, OneToOneKeyed, Cascade),
    Relation::new(Entity::Exam, "question_id", Entity::Question, ManyToOne, Cascade),
    Relation::new(Entity::QuizResult, "quiz_id", Entity::Quiz, OneToOneKeyed, Protect),
    Relation::new(Entity::AssignmentResult, "assignment_id", Entity::Assignment, ManyToOne, Protect),
    Relation::new(Entity::CartCourse, "course_id", Entity::Course, ManyToOne, Protect),
    Relation::new(Entity::CartCourse, "cart_id", Entity::Cart, ManyToOne, Cascade),
    Relation::new(Entity::Track, "student_id", Entity::Student, OneToOne, Cascade),
    Relation::new(Entity::Track, "assignment_result_id", Entity::AssignmentResult, OneToOne, Protect),
    Relation::new(Entity::Track, "quiz_result_id", Entity::QuizResult, OneToOne, Protect),
    Relation::new(Entity::Certificate, "course_id", Entity::Course, OneToOne, Cascade),
    Relation::new(Entity::Certificate, "student_id", Entity::Student, ManyToOne, Protect),
    Relation::new(Entity::Grade, "quiz_result_id", Entity::QuizResult, ManyToOne, Cascade),
    Relation::new(Entity::Grade, "assignment_result_id", Entity::AssignmentResult, ManyToOne, Cascade),
    Relation::new(Entity::Payment, "course_id", Entity::Course, OneToOne, Cascade),
    Relation::new(Entity::Payment, "student_id", Entity::Student, ManyToOne, Protect),
];

/// Relations that refuse deletion of `parent` while dependents exist.
pub fn protecting(parent: Entity) -> impl Iterator<Item = &'static Relation> {
    RELATIONS
        .iter()
        .filter(move |relation| relation.parent == parent && relation.on_delete == Protect)
}

/// Relations whose dependents are removed together with `parent`.
pub fn cascading(parent: Entity) -> impl Iterator<Item = &'static Relation> {
    RELATIONS
        .iter()
        .filter(move |relation| relation.parent == parent && relation.on_delete == Cascade)
}

pub(crate) fn relation_for_fk_constraint(constraint: &str) -> Option<&'static Relation> {
    RELATIONS.iter().find(|relation| relation.matches_fk_constraint(constraint))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIGRATION: &str = include_str!("../../migrations/20250101000000_store_schema.sql");

    fn table_block(table: &str) -> &'static str {
        let header = format!("CREATE TABLE {table} (");
        let start = MIGRATION.find(&header).unwrap_or_else(|| panic!("table {table} missing"));
        let body = &MIGRATION[start..];
        let end = body.find(");").expect("table block terminator");
        &body[..end]
    }

    #[test]
    fn migration_declares_every_relation_with_its_policy() {
        for relation in RELATIONS {
            let block = table_block(relation.child.table());
            let line = block
                .lines()
                .map(str::trim)
                .find(|line| line.starts_with(&format!("{} ", relation.column)))
                .unwrap_or_else(|| {
                    panic!("{}.{} missing", relation.child.table(), relation.column)
                });
            let expected = format!(
                "REFERENCES {} ({}) ON DELETE {}",
                relation.parent.table(),
                relation.parent.key_column(),
                relation.on_delete.sql()
            );
            assert!(line.contains(&expected), "{line} should contain {expected}");

            match relation.cardinality {
                Cardinality::OneToOneKeyed => assert!(line.contains("PRIMARY KEY"), "{line}"),
                Cardinality::OneToOne => assert!(line.contains("UNIQUE"), "{line}"),
                Cardinality::ManyToOne => {
                    assert!(!line.contains("UNIQUE") && !line.contains("PRIMARY KEY"), "{line}")
                }
            }
        }

        assert_eq!(MIGRATION.matches("REFERENCES").count(), RELATIONS.len());
    }

    #[test]
    fn keyed_relations_use_the_child_key_column() {
        for relation in RELATIONS.iter().filter(|r| r.cardinality == Cardinality::OneToOneKeyed) {
            assert_eq!(relation.child.key_column(), relation.column, "{relation:?}");
        }
    }

    #[test]
    fn course_protects_only_cart_lines() {
        let protected: Vec<Entity> = protecting(Entity::Course).map(|r| r.child).collect();
        assert_eq!(protected, vec![Entity::CartCourse]);

        let cascaded: Vec<Entity> = cascading(Entity::Course).map(|r| r.child).collect();
        assert_eq!(
            cascaded,
            vec![
                Entity::Lesson,
                Entity::Assignment,
                Entity::Exam,
                Entity::Certificate,
                Entity::Payment
            ]
        );
    }

    #[test]
    fn instructor_and_category_protect_courses() {
        for parent in [Entity::Instructor, Entity::Category] {
            let children: Vec<Entity> = protecting(parent).map(|r| r.child).collect();
            assert_eq!(children, vec![Entity::Course], "{parent}");
        }
    }

    #[test]
    fn fk_constraint_names_resolve_to_relations() {
        let relation = relation_for_fk_constraint("assignment_results_assignment_id_fkey")
            .expect("assignment result relation");
        assert_eq!(relation.parent, Entity::Assignment);
        assert_eq!(relation.on_delete, OnDelete::Protect);

        let relation =
            relation_for_fk_constraint("cart_courses_course_id_fkey").expect("cart line relation");
        assert_eq!(relation.child, Entity::CartCourse);

        assert!(relation_for_fk_constraint("courses_id_fkey").is_none());
        assert!(relation_for_fk_constraint("unknown").is_none());
    }

    #[test]
    fn constraint_owner_prefers_longest_table_name() {
        assert_eq!(Entity::owning_constraint("assignments_pkey"), Some(Entity::Assignment));
        assert_eq!(
            Entity::owning_constraint("assignment_results_pkey"),
            Some(Entity::AssignmentResult)
        );
        assert_eq!(Entity::owning_constraint("cart_courses_pkey"), Some(Entity::CartCourse));
        assert_eq!(Entity::owning_constraint("courses_instructor_id_key"), Some(Entity::Course));
        assert_eq!(Entity::owning_constraint("nothing_here"), None);
    }
}
