use cleaning_roster::db::{Database, RosterStore};
use cleaning_roster::error::RosterError;
use cleaning_roster::models::*;
use speculate2::speculate;

fn add_cleaner(db: &Database, name: &str) -> Cleaner {
    db.insert_cleaner(name).expect("Failed to add cleaner")
}

fn add_task(db: &Database, cleaner_id: RowId, day: &str, task: &str) -> Task {
    db.insert_task(&CreateTaskInput {
        cleaner_id,
        day: day.to_string(),
        task: task.to_string(),
    })
    .expect("Failed to add task")
}

speculate! {
    before {
        let db = Database::open_memory().expect("Failed to create in-memory database");
        db.initialize().expect("Failed to initialize");
    }

    describe "initialize" {
        it "seeds exactly one Admin cleaner" {
            let cleaners = db.list_cleaners().expect("Query failed");
            assert_eq!(cleaners.len(), 1);
            assert_eq!(cleaners[0].name, ADMIN_CLEANER_NAME);
        }

        it "does not duplicate Admin when run again" {
            db.initialize().expect("Second initialize failed");
            db.initialize().expect("Third initialize failed");

            let admins = db
                .list_cleaners()
                .expect("Query failed")
                .into_iter()
                .filter(|c| c.name == ADMIN_CLEANER_NAME)
                .count();
            assert_eq!(admins, 1);
        }

        it "re-seeds Admin after it was removed" {
            let admin = db.find_cleaner_by_name(ADMIN_CLEANER_NAME).expect("Query failed").unwrap();
            db.delete_cleaner(admin.id).expect("Delete failed");

            db.initialize().expect("Initialize failed");

            assert!(db.find_cleaner_by_name(ADMIN_CLEANER_NAME).expect("Query failed").is_some());
        }
    }

    describe "cleaners" {
        describe "insert_cleaner" {
            it "assigns an id and stores the trimmed name" {
                let cleaner = add_cleaner(&db, "  Robin ");
                assert_eq!(cleaner.name, "Robin");

                let found = db.get_cleaner(cleaner.id).expect("Query failed");
                assert_eq!(found, Some(cleaner));
            }

            it "rejects a blank name" {
                let err = db.insert_cleaner("   ").unwrap_err();
                assert!(matches!(err, RosterError::Validation(_)));
                assert_eq!(db.list_cleaners().expect("Query failed").len(), 1);
            }

            it "rejects a duplicate name" {
                add_cleaner(&db, "Robin");
                let err = db.insert_cleaner("Robin").unwrap_err();
                assert!(matches!(err, RosterError::Conflict(_)));
                assert_eq!(db.list_cleaners().expect("Query failed").len(), 2);
            }
        }

        describe "find_cleaner_by_name" {
            it "returns None for an unknown name" {
                assert!(db.find_cleaner_by_name("Nobody").expect("Query failed").is_none());
            }

            it "matches the exact name" {
                let robin = add_cleaner(&db, "Robin");
                assert_eq!(db.find_cleaner_by_name("Robin").expect("Query failed"), Some(robin));
                assert!(db.find_cleaner_by_name("robin").expect("Query failed").is_none());
            }
        }

        describe "list_cleaners" {
            it "returns cleaners in creation order" {
                add_cleaner(&db, "Zoe");
                add_cleaner(&db, "Alex");

                let names: Vec<_> = db
                    .list_cleaners()
                    .expect("Query failed")
                    .into_iter()
                    .map(|c| c.name)
                    .collect();
                assert_eq!(names, vec!["Admin", "Zoe", "Alex"]);
            }
        }

        describe "delete_cleaner" {
            it "removes the cleaner and all of their tasks" {
                let robin = add_cleaner(&db, "Robin");
                let sam = add_cleaner(&db, "Sam");
                add_task(&db, robin.id, "Monday", "Vacuum");
                add_task(&db, robin.id, "Tuesday", "Dishes");
                let kept = add_task(&db, sam.id, "Monday", "Laundry");

                assert!(db.delete_cleaner(robin.id).expect("Delete failed"));

                assert!(db.get_cleaner(robin.id).expect("Query failed").is_none());
                let tasks = db.list_tasks(None).expect("Query failed");
                assert_eq!(tasks.len(), 1);
                assert_eq!(tasks[0].id, kept.id);
                assert!(tasks.iter().all(|t| t.cleaner != "Robin"));
            }

            it "is a no-op for an unknown id" {
                assert!(!db.delete_cleaner(9999).expect("Delete failed"));
                assert_eq!(db.list_cleaners().expect("Query failed").len(), 1);
            }
        }
    }

    describe "tasks" {
        describe "insert_task" {
            it "creates an incomplete task" {
                let robin = add_cleaner(&db, "Robin");
                let task = add_task(&db, robin.id, "Monday", "Vacuum");

                assert!(!task.completed);
                assert_eq!(db.get_task(task.id).expect("Query failed"), Some(task.clone()));

                let listed = db.list_tasks(None).expect("Query failed");
                assert_eq!(listed, vec![TaskWithCleaner {
                    id: task.id,
                    cleaner_id: robin.id,
                    cleaner: "Robin".to_string(),
                    day: "Monday".to_string(),
                    task: "Vacuum".to_string(),
                    completed: false,
                }]);
            }

            it "rejects an unknown cleaner without writing a row" {
                let err = db.insert_task(&CreateTaskInput {
                    cleaner_id: 9999,
                    day: "Monday".to_string(),
                    task: "Vacuum".to_string(),
                }).unwrap_err();

                assert!(matches!(err, RosterError::Validation(_)));
                assert!(db.list_tasks(None).expect("Query failed").is_empty());
            }

            it "keeps day as free text" {
                let robin = add_cleaner(&db, "Robin");
                let task = add_task(&db, robin.id, "Second Sunday of the month", "Windows");
                assert_eq!(task.day, "Second Sunday of the month");
            }
        }

        describe "list_tasks" {
            it "filters by cleaner" {
                let robin = add_cleaner(&db, "Robin");
                let sam = add_cleaner(&db, "Sam");
                add_task(&db, robin.id, "Monday", "Vacuum");
                add_task(&db, sam.id, "Monday", "Laundry");
                add_task(&db, robin.id, "Friday", "Bins");

                let tasks = db.list_tasks(Some(robin.id)).expect("Query failed");
                assert_eq!(tasks.len(), 2);
                assert!(tasks.iter().all(|t| t.cleaner_id == robin.id && t.cleaner == "Robin"));

                assert_eq!(db.list_tasks(None).expect("Query failed").len(), 3);
            }

            it "returns nothing for an unknown cleaner" {
                let robin = add_cleaner(&db, "Robin");
                add_task(&db, robin.id, "Monday", "Vacuum");

                assert!(db.list_tasks(Some(9999)).expect("Query failed").is_empty());
            }
        }

        describe "set_task_completed" {
            it "updates only the given task" {
                let robin = add_cleaner(&db, "Robin");
                let first = add_task(&db, robin.id, "Monday", "Vacuum");
                let second = add_task(&db, robin.id, "Monday", "Dishes");

                assert!(db.set_task_completed(first.id, true).expect("Update failed"));

                assert!(db.get_task(first.id).expect("Query failed").unwrap().completed);
                assert!(!db.get_task(second.id).expect("Query failed").unwrap().completed);
            }

            it "can mark a task not completed again" {
                let robin = add_cleaner(&db, "Robin");
                let task = add_task(&db, robin.id, "Monday", "Vacuum");

                db.set_task_completed(task.id, true).expect("Update failed");
                db.set_task_completed(task.id, false).expect("Update failed");

                assert!(!db.get_task(task.id).expect("Query failed").unwrap().completed);
            }

            it "is a no-op for an unknown id" {
                assert!(!db.set_task_completed(9999, true).expect("Update failed"));
            }
        }

        describe "delete_task" {
            it "removes the task" {
                let robin = add_cleaner(&db, "Robin");
                let task = add_task(&db, robin.id, "Monday", "Vacuum");

                assert!(db.delete_task(task.id).expect("Delete failed"));
                assert!(db.get_task(task.id).expect("Query failed").is_none());
            }

            it "is a no-op for an unknown id" {
                assert!(!db.delete_task(9999).expect("Delete failed"));
            }
        }
    }

    describe "persistence" {
        it "keeps data across reopen" {
            let dir = tempfile::tempdir().expect("Failed to create temp dir");
            let path = dir.path().join("nested").join("roster.db");

            {
                let disk = Database::open(path.clone()).expect("Failed to open");
                disk.initialize().expect("Failed to initialize");
                let robin = disk.insert_cleaner("Robin").expect("Insert failed");
                add_task(&disk, robin.id, "Monday", "Vacuum");
            }

            let reopened = Database::open(path).expect("Failed to reopen");
            reopened.initialize().expect("Failed to initialize");

            assert_eq!(reopened.list_cleaners().expect("Query failed").len(), 2);
            assert_eq!(reopened.list_tasks(None).expect("Query failed").len(), 1);
        }

        it "lists tasks from an untracked legacy database with NULL columns" {
            let dir = tempfile::tempdir().expect("Failed to create temp dir");
            let path = dir.path().join("legacy.db");

            {
                let legacy = rusqlite::Connection::open(&path).expect("Failed to open");
                legacy.execute_batch(
                    "
                    CREATE TABLE cleaners (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL);
                    CREATE TABLE tasks (
                        id INTEGER PRIMARY KEY AUTOINCREMENT,
                        cleaner_id INTEGER,
                        day TEXT,
                        task TEXT,
                        completed BOOLEAN DEFAULT 0,
                        FOREIGN KEY (cleaner_id) REFERENCES cleaners (id)
                    );
                    INSERT INTO cleaners (id, name) VALUES (1, 'Admin'), (2, 'Robin');
                    INSERT INTO tasks (cleaner_id, day, task, completed) VALUES (2, 'Monday', 'Vacuum', 1);
                    INSERT INTO tasks (cleaner_id, day, task, completed) VALUES (2, NULL, 'Dishes', NULL);
                    ",
                ).expect("Failed to build legacy layout");
            }

            let upgraded = Database::open(path).expect("Failed to open");
            upgraded.initialize().expect("Failed to initialize");

            let tasks = upgraded.list_tasks(None).expect("Query failed");
            assert_eq!(tasks.len(), 2);
            assert!(tasks[0].completed);
            assert_eq!(tasks[1].day, "");
            assert_eq!(tasks[1].task, "Dishes");
            assert!(!tasks[1].completed);

            let fetched = upgraded.get_task(tasks[1].id).expect("Query failed").unwrap();
            assert_eq!(fetched.cleaner_id, 2);
            assert_eq!(upgraded.list_cleaners().expect("Query failed").len(), 2);
        }
    }
}
