use crate::error::AppError;
use crate::models::Product;
use futures::TryStreamExt;
use mongodb::{
    bson::doc,
    error::{ErrorKind, WriteFailure},
    options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument},
    Client as MongoClient, Collection, Database, IndexModel,
};

#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
}

impl MongoDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!(uri = %uri, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB at {}: {}", uri, e);
            AppError::DatabaseError(
                "Database connection failed".to_string(),
                anyhow::anyhow!(e.to_string()),
            )
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for product-service");

        let products = self.products();

        // Unique index on id: duplicate inserts are rejected by the storage
        // layer rather than pre-checked by the application.
        let product_id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .name("product_id_idx".to_string())
                    .unique(true)
                    .build(),
            )
            .build();

        products
            .create_index(product_id_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create product id index: {}", e);
                AppError::DatabaseError(
                    "Index creation failed".to_string(),
                    anyhow::anyhow!(e.to_string()),
                )
            })?;

        tracing::info!("Successfully created all MongoDB indexes");
        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::DatabaseError(
                    "Database health check failed".to_string(),
                    anyhow::anyhow!(e.to_string()),
                )
            })?;
        Ok(())
    }

    pub fn products(&self) -> Collection<Product> {
        self.db.collection("products")
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }

    pub async fn find_product(&self, id: i32) -> Result<Option<Product>, AppError> {
        self.products()
            .find_one(doc! { "id": id }, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to find product {}: {}", id, e);
                AppError::ReadError(
                    "Error fetching product".to_string(),
                    anyhow::anyhow!(e.to_string()),
                )
            })
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, AppError> {
        let cursor = self.products().find(doc! {}, None).await.map_err(|e| {
            tracing::error!("Failed to query products: {}", e);
            AppError::ReadError(
                "Error fetching products".to_string(),
                anyhow::anyhow!(e.to_string()),
            )
        })?;

        let products: Vec<Product> = cursor.try_collect().await.map_err(|e| {
            tracing::error!("Failed to collect products: {}", e);
            AppError::ReadError(
                "Error fetching products".to_string(),
                anyhow::anyhow!(e.to_string()),
            )
        })?;

        Ok(products)
    }

    /// Persist a new product. A duplicate id is rejected by the unique index
    /// and reported as a client error with the driver's message attached.
    pub async fn insert_product(&self, product: &Product) -> Result<(), AppError> {
        self.products()
            .insert_one(product, None)
            .await
            .map_err(|e| {
                if is_duplicate_key(&e) {
                    tracing::warn!(id = product.id, "Rejected insert for duplicate product id");
                    AppError::BadRequest(
                        "Error creating product".to_string(),
                        anyhow::anyhow!(e.to_string()),
                    )
                } else {
                    tracing::error!("Failed to insert product {}: {}", product.id, e);
                    AppError::DatabaseError(
                        "Error creating product".to_string(),
                        anyhow::anyhow!(e.to_string()),
                    )
                }
            })?;
        Ok(())
    }

    /// Insert the sample product, treating a lost race against a concurrent
    /// seed of the same id as success. Returns whether this call inserted.
    pub async fn seed_product(&self, product: &Product) -> Result<bool, AppError> {
        match self.products().insert_one(product, None).await {
            Ok(_) => Ok(true),
            Err(e) if is_duplicate_key(&e) => Ok(false),
            Err(e) => {
                tracing::error!("Failed to seed product {}: {}", product.id, e);
                Err(AppError::DatabaseError(
                    "Error seeding product".to_string(),
                    anyhow::anyhow!(e.to_string()),
                ))
            }
        }
    }

    /// Overwrite name and price of the product matching `id`, returning the
    /// post-update document. `None` means no product matched; nothing is
    /// created in that case.
    pub async fn update_product(
        &self,
        id: i32,
        name: &str,
        price: f64,
    ) -> Result<Option<Product>, AppError> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        self.products()
            .find_one_and_update(
                doc! { "id": id },
                doc! { "$set": { "name": name, "price": price } },
                options,
            )
            .await
            .map_err(|e| {
                tracing::error!("Failed to update product {}: {}", id, e);
                AppError::BadRequest("Update failed".to_string(), anyhow::anyhow!(e.to_string()))
            })
    }

    /// Remove the product matching `id`, returning the removed document.
    pub async fn delete_product(&self, id: i32) -> Result<Option<Product>, AppError> {
        self.products()
            .find_one_and_delete(doc! { "id": id }, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete product {}: {}", id, e);
                AppError::DatabaseError(
                    "Delete failed".to_string(),
                    anyhow::anyhow!(e.to_string()),
                )
            })
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => write_error.code == 11000,
        _ => false,
    }
}
