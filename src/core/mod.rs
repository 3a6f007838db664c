pub mod catalog;
pub mod contact_form;
pub mod dom;
pub mod generation;
pub mod populator;
pub mod renderer;
pub mod site;

pub use crate::domain::model::{GeneratedContent, GenerationRequest, Service, ServiceDescription};
pub use crate::domain::ports::{ConfigProvider, ContentGenerator, Storage};
pub use crate::utils::error::Result;
