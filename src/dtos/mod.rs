pub mod products;

pub use products::{CreateProductRequest, MessageResponse, ProductResponse, UpdateProductRequest};
