// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod dashboard;
pub mod display;
pub mod ids;
pub mod lists;
pub mod model;
pub mod notes;
pub mod pages;
pub mod paging;
pub mod search;
pub mod service;
pub mod session;
pub mod summary;

pub use dashboard::*;
pub use ids::*;
pub use lists::*;
pub use model::*;
pub use notes::*;
pub use pages::*;
pub use paging::*;
pub use search::*;
pub use service::*;
pub use session::*;
pub use summary::*;
