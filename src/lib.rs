//! HTTP service that renders stakeholder salience diagrams (three overlapping
//! attribute sets with the stakeholders of every region) as PNG images.

pub mod config;
pub mod diagram;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
pub mod stakeholder;
