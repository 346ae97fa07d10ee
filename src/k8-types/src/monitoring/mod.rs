pub mod service_monitor;
