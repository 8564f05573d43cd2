// External I/O operations module
pub mod acpi; // ACPI event listener process
pub mod lock; // Single-instance lock file
pub mod signals; // Unix signal handling and the main loop channel
