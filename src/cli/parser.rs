use clap::{Parser, Subcommand};

/// Command-line interface definition for rShift
/// Time & attendance engine: clock in/out, task timers, timesheet ledger
#[derive(Parser)]
#[command(
    name = "rshift",
    version = env!("CARGO_PKG_VERSION"),
    about = "Time & attendance engine: clock in/out, task timers and a timesheet ledger on SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// Print command results as JSON
    #[arg(global = true, long = "json")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Show or check the configuration file
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Copy the database to a backup file
    Backup {
        #[arg(long = "file", help = "Destination file")]
        file: String,

        #[arg(long = "compress", help = "Zip the backup")]
        compress: bool,

        #[arg(long = "force", help = "Overwrite the destination without asking")]
        force: bool,
    },

    /// Employee directory
    Employee {
        #[command(subcommand)]
        action: EmployeeCmd,
    },

    /// Task listing
    Task {
        #[command(subcommand)]
        action: TaskCmd,
    },

    /// Clock an employee in
    In {
        /// Employee id
        employee: String,

        #[arg(long = "at", help = "Clock-in instant (default: now)")]
        at: Option<String>,
    },

    /// Clock an employee out, auto-stopping any running timer
    Out {
        /// Employee id
        employee: String,

        #[arg(long = "at", help = "Clock-out instant (default: now)")]
        at: Option<String>,
    },

    /// Show today's open attendance session of an employee
    Status {
        /// Employee id
        employee: String,
    },

    /// Attendance totals and absences over a period
    Summary {
        #[arg(long = "employee", help = "Restrict to one employee id")]
        employee: Option<String>,

        #[arg(
            long,
            short,
            help = "YYYY, YYYY-MM, YYYY-MM-DD or FROM:TO (default: current month)"
        )]
        period: Option<String>,
    },

    /// Start or stop a task timer
    Timer {
        #[command(subcommand)]
        action: TimerCmd,
    },

    /// List timesheet ledger entries
    Ledger {
        #[arg(long = "task", help = "Filter by task id")]
        task: Option<i64>,

        #[arg(long = "employee", help = "Filter by employee id")]
        employee: Option<String>,
    },

    /// List audit history
    History {
        #[arg(long = "entity", help = "Filter by entity: attendance, task, or a task id")]
        entity: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum EmployeeCmd {
    /// Add or update an employee
    Add {
        id: String,
        name: String,

        #[arg(long = "inactive", help = "Register the employee as inactive")]
        inactive: bool,
    },

    /// List employees
    List,
}

#[derive(Subcommand)]
pub enum TaskCmd {
    /// Add a task
    Add {
        title: String,

        #[arg(
            long = "assign",
            help = "Assigned employee names, separated by ',' ';' or '|'"
        )]
        assign: String,

        #[arg(long = "labels", default_value = "")]
        labels: String,
    },

    /// List tasks
    List {
        #[arg(long = "running", help = "Only tasks with a running timer")]
        running: bool,
    },
}

#[derive(Subcommand)]
pub enum TimerCmd {
    /// Start a task timer
    Start {
        task: i64,

        #[arg(long = "employee", help = "Employee id")]
        employee: String,

        #[arg(long = "name", help = "Display name (default: from the directory)")]
        name: Option<String>,
    },

    /// Stop a task timer
    Stop {
        task: i64,

        #[arg(long = "employee", help = "Employee id")]
        employee: String,

        #[arg(long = "name", help = "Display name (default: from the directory)")]
        name: Option<String>,

        #[arg(long = "logged-seconds", help = "Seconds measured by the client")]
        logged_seconds: Option<i64>,

        #[arg(long = "start-ms", help = "Client start, epoch milliseconds")]
        start_ms: Option<i64>,

        #[arg(long = "end-ms", help = "Client end, epoch milliseconds")]
        end_ms: Option<i64>,

        #[arg(long = "memo")]
        memo: Option<String>,
    },
}
