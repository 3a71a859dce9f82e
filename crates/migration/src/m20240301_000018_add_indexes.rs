use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Listings are browsed by vendor and by category.
        manager
            .create_index(
                Index::create()
                    .name("idx_listing_vendor")
                    .table(Listing::Table)
                    .col(Listing::VendorId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_listing_category")
                    .table(Listing::Table)
                    .col(Listing::CategoryId)
                    .to_owned(),
            )
            .await?;

        // Bookings are listed per party and filtered by status.
        manager
            .create_index(
                Index::create()
                    .name("idx_booking_customer")
                    .table(Booking::Table)
                    .col(Booking::CustomerId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_booking_vendor_status")
                    .table(Booking::Table)
                    .col(Booking::VendorId)
                    .col(Booking::Status)
                    .to_owned(),
            )
            .await?;

        // Offer lookup: latest pending offer per booking.
        manager
            .create_index(
                Index::create()
                    .name("idx_offer_booking_status")
                    .table(Offer::Table)
                    .col(Offer::BookingId)
                    .col(Offer::Status)
                    .to_owned(),
            )
            .await?;

        // Chat: message fetch per conversation, unread scan per user.
        manager
            .create_index(
                Index::create()
                    .name("idx_message_conversation")
                    .table(Message::Table)
                    .col(Message::ConversationId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_notification_user")
                    .table(Notification::Table)
                    .col(Notification::UserId)
                    .to_owned(),
            )
            .await?;

        // Reviews are listed per vendor.
        manager
            .create_index(
                Index::create()
                    .name("idx_review_vendor")
                    .table(Review::Table)
                    .col(Review::VendorId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_listing_vendor").table(Listing::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_listing_category").table(Listing::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_booking_customer").table(Booking::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_booking_vendor_status").table(Booking::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_offer_booking_status").table(Offer::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_message_conversation").table(Message::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_notification_user").table(Notification::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_review_vendor").table(Review::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Listing { Table, VendorId, CategoryId }

#[derive(DeriveIden)]
enum Booking { Table, CustomerId, VendorId, Status }

#[derive(DeriveIden)]
enum Offer { Table, BookingId, Status }

#[derive(DeriveIden)]
enum Message { Table, ConversationId }

#[derive(DeriveIden)]
enum Notification { Table, UserId }

#[derive(DeriveIden)]
enum Review { Table, VendorId }
