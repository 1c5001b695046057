//! Pure collection reducers.
//!
//! Each reducer takes the previous collection and returns the next one.
//! The input is never modified; when nothing changes the same `Arc` is
//! returned so reference-equality checks downstream stay quiet.

use crate::error::{Result, StoreError};
use crate::types::{CartItem, Entity, EntityId, PosProduct};
use std::collections::HashSet;
use std::sync::Arc;

/// Insert an entity at the front (newest-first convention).
pub fn prepend<T: Entity>(prev: &Arc<Vec<T>>, item: T) -> Result<Arc<Vec<T>>> {
    ensure_absent(prev.as_slice(), item.id())?;

    let mut next = Vec::with_capacity(prev.len() + 1);
    next.push(item);
    next.extend(prev.iter().cloned());
    Ok(Arc::new(next))
}

/// Insert an entity at the back.
pub fn append<T: Entity>(prev: &Arc<Vec<T>>, item: T) -> Result<Arc<Vec<T>>> {
    ensure_absent(prev.as_slice(), item.id())?;

    let mut next = Vec::with_capacity(prev.len() + 1);
    next.extend(prev.iter().cloned());
    next.push(item);
    Ok(Arc::new(next))
}

/// Replace the entity sharing `item`'s id, keeping its position.
pub fn replace_by_id<T: Entity>(prev: &Arc<Vec<T>>, item: T) -> Result<Arc<Vec<T>>> {
    let index = position(prev.as_slice(), item.id())?;

    if prev[index] == item {
        return Ok(Arc::clone(prev));
    }

    let mut next = prev.to_vec();
    next[index] = item;
    Ok(Arc::new(next))
}

/// Derive a new version of one entity from its current value.
///
/// The edit may not change the entity's identifier.
pub fn update_by_id<T, F>(prev: &Arc<Vec<T>>, id: &EntityId, edit: F) -> Result<Arc<Vec<T>>>
where
    T: Entity,
    F: FnOnce(&T) -> T,
{
    let index = position(prev.as_slice(), id)?;
    let edited = edit(&prev[index]);

    if edited.id() != id {
        return Err(StoreError::IdentifierChanged {
            collection: T::COLLECTION,
            id: id.clone(),
        });
    }

    replace_by_id(prev, edited)
}

/// Remove an entity. Removing an unknown id is a no-op.
pub fn remove_by_id<T: Entity>(prev: &Arc<Vec<T>>, id: &EntityId) -> Arc<Vec<T>> {
    if !prev.iter().any(|item| item.id() == id) {
        return Arc::clone(prev);
    }

    Arc::new(
        prev.iter()
            .filter(|item| item.id() != id)
            .cloned()
            .collect(),
    )
}

/// Replace the entity with the same id, or prepend it when absent.
pub fn upsert<T: Entity>(prev: &Arc<Vec<T>>, item: T) -> Result<Arc<Vec<T>>> {
    if prev.iter().any(|existing| existing.id() == item.id()) {
        replace_by_id(prev, item)
    } else {
        prepend(prev, item)
    }
}

/// Find the first identifier that occurs more than once.
pub fn first_duplicate<T: Entity>(items: &[T]) -> Option<&EntityId> {
    let mut seen = HashSet::with_capacity(items.len());
    items.iter().map(Entity::id).find(|id| !seen.insert(*id))
}

// --- Cart ---

/// Add `quantity` units of a product to the cart.
///
/// An existing line for the same product has its quantity raised; otherwise
/// a new line is placed first.
pub fn add_to_cart(prev: &Arc<Vec<CartItem>>, product: &PosProduct, quantity: u32) -> Arc<Vec<CartItem>> {
    if quantity == 0 {
        return Arc::clone(prev);
    }

    if prev.iter().any(|line| line.product_id == product.id) {
        let next = prev
            .iter()
            .map(|line| {
                if line.product_id == product.id {
                    CartItem {
                        quantity: line.quantity.saturating_add(quantity),
                        ..line.clone()
                    }
                } else {
                    line.clone()
                }
            })
            .collect();
        return Arc::new(next);
    }

    let line = CartItem {
        id: EntityId::generate(),
        product_id: product.id.clone(),
        name: product.name.clone(),
        unit_price: product.price,
        quantity,
    };
    let mut next = Vec::with_capacity(prev.len() + 1);
    next.push(line);
    next.extend(prev.iter().cloned());
    Arc::new(next)
}

/// Sum of all line totals.
pub fn cart_total(items: &[CartItem]) -> f64 {
    items.iter().map(CartItem::line_total).sum()
}

fn ensure_absent<T: Entity>(items: &[T], id: &EntityId) -> Result<()> {
    if items.iter().any(|item| item.id() == id) {
        return Err(StoreError::DuplicateId {
            collection: T::COLLECTION,
            id: id.clone(),
        });
    }
    Ok(())
}

fn position<T: Entity>(items: &[T], id: &EntityId) -> Result<usize> {
    items
        .iter()
        .position(|item| item.id() == id)
        .ok_or_else(|| StoreError::EntityNotFound {
            collection: T::COLLECTION,
            id: id.clone(),
        })
}
