pub use sea_orm_migration::prelude::*;

mod m20260105_000000_create_users;
mod m20260105_000001_create_games;
mod m20260105_000002_create_user_games;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260105_000000_create_users::Migration),
            Box::new(m20260105_000001_create_games::Migration),
            Box::new(m20260105_000002_create_user_games::Migration),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_ordered() {
        let names: Vec<String> = Migrator::migrations().iter().map(|m| m.name().to_string()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert_eq!(names.len(), 3);
    }
}
