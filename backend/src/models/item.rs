use closet_rental_shared::{CreateItemRequest, ItemPatch};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor, Postgres, QueryBuilder};

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Item {
    pub item_id: i32,
    pub name: String,
    pub color: Option<String>,
    /// Minor currency units.
    pub price: i32,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub image_ref: Option<String>,
    pub is_liked: Option<bool>,
    pub purchase_year: Option<i32>,
    pub purchase_country: Option<String>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub renter_name: Option<String>,
    pub renter_lastname: Option<String>,
    pub renter_email: Option<String>,
    pub availability: Option<String>,
    pub size: Option<String>,
    pub laundry_charge: Option<i32>,
    pub renters_commission: Option<i32>,
    pub safe_deposit: Option<i32>,
    pub independent_designer_dress: Option<bool>,
    pub user_id: i32,
    pub purchase_price_paid_by_renter: Option<i32>,
    /// Role of the owner, only populated by the catalog listing.
    #[sqlx(default)]
    pub owner_role_id: Option<i32>,
}

/// Appends `column = $n` for every field of the patch that is present.
/// Column names come from the field identifiers, never from input.
macro_rules! set_columns {
    ($separated:expr, $patch:expr, $count:ident; $($field:ident),+ $(,)?) => {
        $(
            if let Some(value) = &$patch.$field {
                $separated
                    .push(concat!(stringify!($field), " = "))
                    .push_bind_unseparated(value.clone());
                $count += 1;
            }
        )+
    };
}

impl Item {
    pub async fn create<'e, E>(
        executor: E,
        owner_id: i32,
        request: &CreateItemRequest,
    ) -> Result<Self, AppError>
    where
        E: PgExecutor<'e>,
    {
        let item = sqlx::query_as::<_, Item>(
            r#"
            INSERT INTO items (
                name, color, price, brand, category, image_ref, is_liked, purchase_year,
                purchase_country, description, short_description, renter_name, renter_lastname,
                renter_email, availability, size, laundry_charge, renters_commission,
                safe_deposit, independent_designer_dress, user_id, purchase_price_paid_by_renter
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $21, $22)
            RETURNING *
            "#,
        )
        .bind(&request.name)
        .bind(&request.color)
        .bind(request.price)
        .bind(&request.brand)
        .bind(&request.category)
        .bind(&request.image_ref)
        .bind(request.is_liked)
        .bind(request.purchase_year)
        .bind(&request.purchase_country)
        .bind(&request.description)
        .bind(&request.short_description)
        .bind(&request.renter_name)
        .bind(&request.renter_lastname)
        .bind(&request.renter_email)
        .bind(&request.availability)
        .bind(&request.size)
        .bind(request.laundry_charge)
        .bind(request.renters_commission)
        .bind(request.safe_deposit)
        .bind(request.independent_designer_dress)
        .bind(owner_id)
        .bind(request.purchase_price_paid_by_renter)
        .fetch_one(executor)
        .await?;

        Ok(item)
    }

    pub async fn find_by_id<'e, E>(executor: E, item_id: i32) -> Result<Option<Self>, AppError>
    where
        E: PgExecutor<'e>,
    {
        let item = sqlx::query_as::<_, Item>("SELECT * FROM items WHERE item_id = $1")
            .bind(item_id)
            .fetch_optional(executor)
            .await?;

        Ok(item)
    }

    /// Every item together with its owner's role, in a single round trip.
    pub async fn find_all_with_owner_role<'e, E>(executor: E) -> Result<Vec<Self>, AppError>
    where
        E: PgExecutor<'e>,
    {
        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT i.*,
                   (SELECT ur.role_id
                      FROM user_roles ur
                     WHERE ur.user_id = i.user_id
                     ORDER BY ur.role_id
                     LIMIT 1) AS owner_role_id
            FROM items i
            ORDER BY i.item_id
            "#,
        )
        .fetch_all(executor)
        .await?;

        Ok(items)
    }

    /// `UPDATE items SET ...` over the present fields of `patch`, or `None`
    /// when the patch is empty.
    pub fn build_patch_query(item_id: i32, patch: &ItemPatch) -> Option<QueryBuilder<'static, Postgres>> {
        let mut builder = QueryBuilder::new("UPDATE items SET ");
        let mut columns = 0usize;
        {
            let mut separated = builder.separated(", ");
            set_columns!(separated, patch, columns;
                name,
                color,
                price,
                brand,
                category,
                image_ref,
                is_liked,
                purchase_year,
                purchase_country,
                description,
                short_description,
                renter_name,
                renter_lastname,
                renter_email,
                availability,
                size,
                laundry_charge,
                renters_commission,
                safe_deposit,
                independent_designer_dress,
                purchase_price_paid_by_renter,
            );
        }
        if columns == 0 {
            return None;
        }

        builder
            .push(" WHERE item_id = ")
            .push_bind(item_id)
            .push(" RETURNING *");
        Some(builder)
    }

    /// Applies `patch` and returns the stored row; `None` if the item does not exist.
    pub async fn update<'e, E>(
        executor: E,
        item_id: i32,
        patch: &ItemPatch,
    ) -> Result<Option<Self>, AppError>
    where
        E: PgExecutor<'e>,
    {
        let Some(mut builder) = Self::build_patch_query(item_id, patch) else {
            return Self::find_by_id(executor, item_id).await;
        };

        let item = builder
            .build_query_as::<Item>()
            .fetch_optional(executor)
            .await?;

        Ok(item)
    }

    pub async fn delete<'e, E>(executor: E, item_id: i32) -> Result<bool, AppError>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM items WHERE item_id = $1")
            .bind(item_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn has_order_history<'e, E>(executor: E, item_id: i32) -> Result<bool, AppError>
    where
        E: PgExecutor<'e>,
    {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM order_details WHERE item_id = $1)",
        )
        .bind(item_id)
        .fetch_one(executor)
        .await?;

        Ok(exists)
    }

    /// True when any item owned by `user_id` appears on an order.
    pub async fn owner_has_order_history<'e, E>(executor: E, user_id: i32) -> Result<bool, AppError>
    where
        E: PgExecutor<'e>,
    {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM order_details od
                JOIN items i ON i.item_id = od.item_id
                WHERE i.user_id = $1
            )
            "#,
        )
        .bind(user_id)
        .fetch_one(executor)
        .await?;

        Ok(exists)
    }

    pub async fn delete_by_owner<'e, E>(executor: E, user_id: i32) -> Result<u64, AppError>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM items WHERE user_id = $1")
            .bind(user_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }
}
