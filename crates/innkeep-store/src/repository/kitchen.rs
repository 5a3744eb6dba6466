//! Restaurant and stock-room helpers.

use innkeep_core::{
    InventoryItem, InventoryPatch, Order, OrderPatch, OrderStatus, Transaction, TransactionType,
};

use super::Repository;
use crate::error::StoreResult;
use crate::query::SelectOptions;

impl Repository<Order> {
    /// Orders still in the kitchen (pending, preparing or ready), oldest first.
    pub async fn in_progress(&self) -> StoreResult<Vec<Order>> {
        let mut orders = Vec::new();
        for status in OrderStatus::IN_PROGRESS {
            orders.extend(
                self.find(&SelectOptions::new().filter("status", status.as_str()))
                    .await?,
            );
        }
        orders.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(orders)
    }

    /// Moves an order to `status`.
    pub async fn advance(&self, id: &str, status: OrderStatus) -> StoreResult<Order> {
        self.update(
            id,
            &OrderPatch {
                status: Some(status),
                ..Default::default()
            },
        )
        .await
    }
}

impl Repository<InventoryItem> {
    /// Items at or below their minimum stock level.
    pub async fn low_stock(&self) -> StoreResult<Vec<InventoryItem>> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .filter(InventoryItem::is_low_stock)
            .collect())
    }

    /// Sets the on-hand quantity of an item.
    pub async fn restock(&self, id: &str, current_stock: f64) -> StoreResult<InventoryItem> {
        self.update(
            id,
            &InventoryPatch {
                current_stock: Some(current_stock),
                ..Default::default()
            },
        )
        .await
    }
}

impl Repository<Transaction> {
    /// Ledger entries of one kind, newest `date` first.
    pub async fn of_kind(&self, kind: TransactionType) -> StoreResult<Vec<Transaction>> {
        self.find(
            &SelectOptions::new()
                .filter("type", kind.as_str())
                .order_by_desc("date"),
        )
        .await
    }
}
