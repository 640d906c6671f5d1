//! PostgreSQL implementation of BookingRepository.
//!
//! Bookings are stored in a single `bookings` table; the subject variant
//! is flattened into nullable columns discriminated by `subject_kind`.
//! Payment reference uniqueness is a partial unique index, so the insert
//! of a confirmed booking is the atomic claim of its reference.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::booking::{Booking, BookingStatus, BookingSubject, PaymentStatus};
use crate::domain::foundation::{BookingId, UserId};
use crate::domain::payment::CurrencyCode;
use crate::ports::{BookingRepository, RepositoryError};

/// PostgreSQL implementation of the BookingRepository port.
pub struct PostgresBookingRepository {
    pool: PgPool,
}

impl PostgresBookingRepository {
    /// Creates a new PostgresBookingRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a booking.
#[derive(Debug, sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    user_id: String,
    subject_kind: String,
    hotel_id: Option<Uuid>,
    room_id: Option<Uuid>,
    check_in: Option<NaiveDate>,
    check_out: Option<NaiveDate>,
    flight_id: Option<Uuid>,
    total_price: Decimal,
    currency: String,
    payment_reference: Option<String>,
    status: String,
    payment_status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = RepositoryError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let subject = parse_subject(&row)?;
        let status = parse_status(&row.status)?;
        let payment_status = parse_payment_status(&row.payment_status)?;
        let currency = CurrencyCode::parse(&row.currency)
            .map_err(|e| RepositoryError::Database(format!("invalid currency column: {}", e)))?;
        let user_id = UserId::new(row.user_id)
            .map_err(|e| RepositoryError::Database(format!("invalid user_id column: {}", e)))?;

        Ok(Booking {
            id: BookingId::from_uuid(row.id),
            user_id,
            subject,
            total_price: row.total_price,
            currency,
            payment_reference: row.payment_reference,
            status,
            payment_status,
            created_at: row.created_at,
        })
    }
}

fn parse_subject(row: &BookingRow) -> Result<BookingSubject, RepositoryError> {
    match row.subject_kind.as_str() {
        "hotel" => match (row.hotel_id, row.room_id, row.check_in, row.check_out) {
            (Some(hotel_id), Some(room_id), Some(check_in), Some(check_out)) => {
                Ok(BookingSubject::Hotel {
                    hotel_id,
                    room_id,
                    check_in,
                    check_out,
                })
            }
            _ => Err(RepositoryError::Database(
                "hotel booking row missing hotel columns".to_string(),
            )),
        },
        "flight" => row
            .flight_id
            .map(|flight_id| BookingSubject::Flight { flight_id })
            .ok_or_else(|| {
                RepositoryError::Database("flight booking row missing flight_id".to_string())
            }),
        other => Err(RepositoryError::Database(format!(
            "invalid subject_kind value: {}",
            other
        ))),
    }
}

fn parse_status(s: &str) -> Result<BookingStatus, RepositoryError> {
    match s {
        "pending" => Ok(BookingStatus::Pending),
        "confirmed" => Ok(BookingStatus::Confirmed),
        "cancelled" => Ok(BookingStatus::Cancelled),
        _ => Err(RepositoryError::Database(format!(
            "invalid status value: {}",
            s
        ))),
    }
}

fn parse_payment_status(s: &str) -> Result<PaymentStatus, RepositoryError> {
    match s {
        "unpaid" => Ok(PaymentStatus::Unpaid),
        "succeeded" => Ok(PaymentStatus::Succeeded),
        "failed" => Ok(PaymentStatus::Failed),
        _ => Err(RepositoryError::Database(format!(
            "invalid payment_status value: {}",
            s
        ))),
    }
}

fn subject_columns(
    subject: &BookingSubject,
) -> (
    &'static str,
    Option<Uuid>,
    Option<Uuid>,
    Option<NaiveDate>,
    Option<NaiveDate>,
    Option<Uuid>,
) {
    match subject {
        BookingSubject::Hotel {
            hotel_id,
            room_id,
            check_in,
            check_out,
        } => (
            "hotel",
            Some(*hotel_id),
            Some(*room_id),
            Some(*check_in),
            Some(*check_out),
            None,
        ),
        BookingSubject::Flight { flight_id } => ("flight", None, None, None, None, Some(*flight_id)),
    }
}

#[async_trait]
impl BookingRepository for PostgresBookingRepository {
    async fn insert(&self, booking: &Booking) -> Result<(), RepositoryError> {
        let (subject_kind, hotel_id, room_id, check_in, check_out, flight_id) =
            subject_columns(&booking.subject);

        sqlx::query(
            r#"
            INSERT INTO bookings (
                id, user_id, subject_kind, hotel_id, room_id, check_in, check_out,
                flight_id, total_price, currency, payment_reference, status,
                payment_status, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(booking.id.as_uuid())
        .bind(booking.user_id.as_str())
        .bind(subject_kind)
        .bind(hotel_id)
        .bind(room_id)
        .bind(check_in)
        .bind(check_out)
        .bind(flight_id)
        .bind(booking.total_price)
        .bind(booking.currency.as_str())
        .bind(&booking.payment_reference)
        .bind(booking.status.as_str())
        .bind(booking.payment_status.as_str())
        .bind(booking.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return RepositoryError::DuplicateReference;
                }
            }
            RepositoryError::Database(format!("failed to insert booking: {}", e))
        })?;

        Ok(())
    }

    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, RepositoryError> {
        let row: Option<BookingRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, subject_kind, hotel_id, room_id, check_in, check_out,
                   flight_id, total_price, currency, payment_reference, status,
                   payment_status, created_at
            FROM bookings
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(format!("failed to find booking: {}", e)))?;

        row.map(Booking::try_from).transpose()
    }

    async fn find_by_payment_reference(
        &self,
        reference: &str,
    ) -> Result<Option<Booking>, RepositoryError> {
        let row: Option<BookingRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, subject_kind, hotel_id, room_id, check_in, check_out,
                   flight_id, total_price, currency, payment_reference, status,
                   payment_status, created_at
            FROM bookings
            WHERE payment_reference = $1
            "#,
        )
        .bind(reference)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(format!("failed to find booking: {}", e)))?;

        row.map(Booking::try_from).transpose()
    }

    async fn update_payment_status(
        &self,
        id: &BookingId,
        status: BookingStatus,
        payment_status: PaymentStatus,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE bookings SET status = $2, payment_status = $3
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(status.as_str())
        .bind(payment_status.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(format!("failed to update booking: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(*id));
        }

        Ok(())
    }
}
