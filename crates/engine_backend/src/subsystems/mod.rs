// +----------------------------------+
// |        Engine Subsystems         |
// +----------------------------------+
pub mod input;
pub mod manipulation;
