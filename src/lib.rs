//! Manual production planning for a machining shop.
//!
//! A planner enters production tasks (part, setup, machine, quantity,
//! per-unit time, start) and this crate computes each task's end, keeps a
//! catalog of standard per-unit times, flags overlapping tasks on the same
//! machine, and projects everything onto a Gantt chart for a chosen
//! day, week, or month. Nothing is scheduled automatically: the planner
//! picks every start time.
//!
//! # Modules
//!
//! - **`models`**: Domain records: `TaskRecord`, `NomenclatureEntry`, `Interval`,
//!   and the raw-string forms the UI submits
//! - **`validation`**: Per-field syntactic checks and parsing
//! - **`store`**: `TaskStore` and `Catalog`, the in-memory tables
//! - **`scheduler`**: End-time computation, conflict detection, display windows
//! - **`import`**: Row codec with strict and lenient bulk loads
//! - **`csv_io`**: Delimited file reading and writing
//! - **`gantt`**: Bar layout for a renderer
//! - **`config`**: Persisted `Settings`
//! - **`planner`**: `Planner`, the session facade a UI drives
//!
//! # Example
//!
//! ```
//! use u_gantt::models::TaskForm;
//! use u_gantt::Planner;
//!
//! let mut planner = Planner::default();
//! let id = planner
//!     .add_task(
//!         &TaskForm::new("Flange A", "1", "DMU-70")
//!             .with_quantity("100")
//!             .with_time_per_unit("2,5")
//!             .with_setup_time("30")
//!             .with_start("01.01.2024 08:00"),
//!     )
//!     .unwrap();
//! assert_eq!(planner.tasks().get(id).unwrap().end.to_string(), "2024-01-01 12:40:00");
//! ```

pub mod config;
pub mod csv_io;
pub mod error;
pub mod gantt;
pub mod import;
pub mod models;
pub mod planner;
pub mod scheduler;
pub mod store;
pub mod validation;

pub use config::Settings;
pub use error::{Error, Result};
pub use planner::{PlanSummary, Planner};
