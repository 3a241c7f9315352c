//! Products service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        products::{
            data::{NewCategory, NewProduct},
            errors::ProductsServiceError,
            records::{CategoryRecord, CategoryUuid, ProductRecord, ProductUuid},
            repository::PgProductsRepository,
        },
        promotions::records::PromotionUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgProductsService {
    db: Db,
    repository: PgProductsRepository,
}

impl PgProductsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgProductsRepository::new(),
        }
    }
}

#[async_trait]
impl ProductsService for PgProductsService {
    async fn create_category(
        &self,
        category: NewCategory,
    ) -> Result<CategoryRecord, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self.repository.create_category(&mut tx, category).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn get_category(
        &self,
        category: CategoryUuid,
    ) -> Result<CategoryRecord, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let category = self.repository.get_category(&mut tx, category).await?;

        tx.commit().await?;

        Ok(category)
    }

    async fn create_product(
        &self,
        product: NewProduct,
    ) -> Result<ProductRecord, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self.repository.create_product(&mut tx, product).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn get_product(&self, product: ProductUuid) -> Result<ProductRecord, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let product = self.repository.get_product(&mut tx, product).await?;

        tx.commit().await?;

        Ok(product)
    }

    async fn get_products(
        &self,
        products: &[ProductUuid],
    ) -> Result<Vec<ProductRecord>, ProductsServiceError> {
        if products.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.db.begin().await?;

        let found = self.repository.get_products(&mut tx, products).await?;

        tx.commit().await?;

        Ok(found)
    }

    async fn list_products(
        &self,
        category: Option<CategoryUuid>,
    ) -> Result<Vec<ProductRecord>, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let products = self.repository.list_products(&mut tx, category).await?;

        tx.commit().await?;

        Ok(products)
    }

    async fn list_promotion_products(
        &self,
        promotion: PromotionUuid,
    ) -> Result<Vec<ProductRecord>, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let products = self
            .repository
            .list_promotion_products(&mut tx, promotion)
            .await?;

        tx.commit().await?;

        Ok(products)
    }

    async fn delete_product(&self, product: ProductUuid) -> Result<(), ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.delete_product(&mut tx, product).await?;

        if rows_affected == 0 {
            return Err(ProductsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Creates a category.
    async fn create_category(
        &self,
        category: NewCategory,
    ) -> Result<CategoryRecord, ProductsServiceError>;

    /// Retrieve a single category.
    async fn get_category(
        &self,
        category: CategoryUuid,
    ) -> Result<CategoryRecord, ProductsServiceError>;

    /// Creates a product, optionally inside a category.
    async fn create_product(&self, product: NewProduct)
    -> Result<ProductRecord, ProductsServiceError>;

    /// Retrieve a single product.
    async fn get_product(&self, product: ProductUuid) -> Result<ProductRecord, ProductsServiceError>;

    /// Retrieve several products at once. Unknown ids are left out of the result.
    async fn get_products(
        &self,
        products: &[ProductUuid],
    ) -> Result<Vec<ProductRecord>, ProductsServiceError>;

    /// Lists products, optionally restricted to one category.
    async fn list_products(
        &self,
        category: Option<CategoryUuid>,
    ) -> Result<Vec<ProductRecord>, ProductsServiceError>;

    /// Lists the products a promotion targets, directly or through their category.
    async fn list_promotion_products(
        &self,
        promotion: PromotionUuid,
    ) -> Result<Vec<ProductRecord>, ProductsServiceError>;

    /// Deletes a product.
    async fn delete_product(&self, product: ProductUuid) -> Result<(), ProductsServiceError>;
}
