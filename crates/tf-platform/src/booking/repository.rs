//! Booking Store
//!
//! `BookingStore` is the persistence contract the lifecycle engine runs
//! against; `MongoBookingRepository` is the production implementation. All
//! listings come back newest-first by creation time.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, Collection, Database};

use crate::booking::entity::{Booking, BookingStatus};
use crate::shared::error::Result;

#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn insert(&self, booking: &Booking) -> Result<()>;

    /// Replace the stored document for `booking.id`.
    async fn update(&self, booking: &Booking) -> Result<()>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>>;

    /// All bookings for one owner, newest-first.
    async fn find_by_owner(&self, owner_id: &str) -> Result<Vec<Booking>>;

    /// One owner's bookings in a given status, newest-first.
    async fn find_by_owner_and_status(
        &self,
        owner_id: &str,
        status: BookingStatus,
    ) -> Result<Vec<Booking>>;

    /// One page across all owners, newest-first.
    async fn find_all_paged(&self, page: u32, size: u32) -> Result<Vec<Booking>>;

    /// Returns whether a document was actually removed.
    async fn delete(&self, id: &str) -> Result<bool>;
}

pub struct MongoBookingRepository {
    collection: Collection<Booking>,
}

impl MongoBookingRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("bookings"),
        }
    }
}

#[async_trait]
impl BookingStore for MongoBookingRepository {
    async fn insert(&self, booking: &Booking) -> Result<()> {
        self.collection.insert_one(booking).await?;
        Ok(())
    }

    async fn update(&self, booking: &Booking) -> Result<()> {
        self.collection
            .replace_one(doc! { "_id": &booking.id }, booking)
            .await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    async fn find_by_owner(&self, owner_id: &str) -> Result<Vec<Booking>> {
        let cursor = self
            .collection
            .find(doc! { "ownerId": owner_id })
            .sort(doc! { "createdAt": -1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_by_owner_and_status(
        &self,
        owner_id: &str,
        status: BookingStatus,
    ) -> Result<Vec<Booking>> {
        let cursor = self
            .collection
            .find(doc! { "ownerId": owner_id, "status": status.as_str() })
            .sort(doc! { "createdAt": -1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_all_paged(&self, page: u32, size: u32) -> Result<Vec<Booking>> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "createdAt": -1 })
            .skip(u64::from(page) * u64::from(size))
            .limit(i64::from(size))
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }
}

#[cfg(test)]
pub(crate) mod memory {
    //! In-memory store for lifecycle engine tests.

    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct InMemoryBookingStore {
        bookings: Mutex<Vec<Booking>>,
    }

    impl InMemoryBookingStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn len(&self) -> usize {
            self.bookings.lock().unwrap().len()
        }
    }

    fn newest_first(bookings: &mut Vec<Booking>) {
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    }

    #[async_trait]
    impl BookingStore for InMemoryBookingStore {
        async fn insert(&self, booking: &Booking) -> Result<()> {
            self.bookings.lock().unwrap().push(booking.clone());
            Ok(())
        }

        async fn update(&self, booking: &Booking) -> Result<()> {
            let mut bookings = self.bookings.lock().unwrap();
            if let Some(slot) = bookings.iter_mut().find(|b| b.id == booking.id) {
                *slot = booking.clone();
            }
            Ok(())
        }

        async fn find_by_id(&self, id: &str) -> Result<Option<Booking>> {
            Ok(self
                .bookings
                .lock()
                .unwrap()
                .iter()
                .find(|b| b.id == id)
                .cloned())
        }

        async fn find_by_owner(&self, owner_id: &str) -> Result<Vec<Booking>> {
            let mut found: Vec<Booking> = self
                .bookings
                .lock()
                .unwrap()
                .iter()
                .filter(|b| b.owner_id == owner_id)
                .cloned()
                .collect();
            newest_first(&mut found);
            Ok(found)
        }

        async fn find_by_owner_and_status(
            &self,
            owner_id: &str,
            status: BookingStatus,
        ) -> Result<Vec<Booking>> {
            let mut found: Vec<Booking> = self
                .bookings
                .lock()
                .unwrap()
                .iter()
                .filter(|b| b.owner_id == owner_id && b.status == status)
                .cloned()
                .collect();
            newest_first(&mut found);
            Ok(found)
        }

        async fn find_all_paged(&self, page: u32, size: u32) -> Result<Vec<Booking>> {
            let mut all: Vec<Booking> = self.bookings.lock().unwrap().clone();
            newest_first(&mut all);
            Ok(all
                .into_iter()
                .skip(page as usize * size as usize)
                .take(size as usize)
                .collect())
        }

        async fn delete(&self, id: &str) -> Result<bool> {
            let mut bookings = self.bookings.lock().unwrap();
            let before = bookings.len();
            bookings.retain(|b| b.id != id);
            Ok(bookings.len() < before)
        }
    }
}
