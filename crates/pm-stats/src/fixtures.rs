//! Snapshot builders shared by the unit tests

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use pm_models::*;
use uuid::Uuid;

pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

pub fn at(minutes: i64) -> DateTime<Utc> {
    epoch() + Duration::minutes(minutes)
}

pub fn property(name: &str, units: Vec<UnitSnapshot>) -> PropertySnapshot {
    let mut snapshot = PropertySnapshot::new(Property {
        id: Uuid::new_v4(),
        user_id: "user_1".into(),
        name: name.into(),
        description: String::new(),
        address: format!("{name} Street"),
        property_type: PropertyType::MultiFamily,
        price: 0.0,
        bedrooms: 0,
        bathrooms: 0.0,
        size: 0.0,
        features: vec![],
        images: vec![],
        status: PropertyStatus::Available,
        created_at: epoch(),
        updated_at: epoch(),
    });
    for mut unit in units {
        unit.unit.property_id = snapshot.property.id;
        snapshot.units.push(unit);
    }
    snapshot
}

pub fn unit(number: &str, tenant: Option<Tenant>) -> UnitSnapshot {
    let status = if tenant.is_some() {
        UnitStatus::Occupied
    } else {
        UnitStatus::Vacant
    };
    let id = Uuid::new_v4();
    UnitSnapshot {
        unit: Unit {
            id,
            property_id: Uuid::nil(),
            unit_number: number.into(),
            status,
            created_at: epoch(),
            updated_at: epoch(),
        },
        tenant: tenant.map(|t| Tenant { unit_id: id, ..t }),
    }
}

pub fn tenant(rent: f64, status: TenantStatus) -> Tenant {
    Tenant {
        id: Uuid::new_v4(),
        unit_id: Uuid::nil(),
        first_name: "Jane".into(),
        last_name: "Doe".into(),
        email: "jane@example.com".into(),
        phone: String::new(),
        emergency_contact: None,
        lease_start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        lease_end: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        rent_amount: rent,
        deposit_amount: 0.0,
        payment_due: 1,
        status,
        created_at: epoch(),
        updated_at: epoch(),
    }
}

pub fn maintenance(status: MaintenanceStatus) -> MaintenanceRequest {
    MaintenanceRequest {
        id: Uuid::new_v4(),
        property_id: Uuid::nil(),
        tenant_id: Uuid::nil(),
        title: "Broken heater".into(),
        description: "No heat in bedroom".into(),
        priority: MaintenancePriority::High,
        category: MaintenanceCategory::Hvac,
        status,
        assigned_to: None,
        cost: None,
        images: vec![],
        created_at: epoch(),
        updated_at: epoch(),
        completed_at: None,
    }
}

pub fn maintenance_at(title: &str, created_at: DateTime<Utc>) -> MaintenanceWithContext {
    MaintenanceWithContext {
        request: MaintenanceRequest {
            title: title.into(),
            created_at,
            ..maintenance(MaintenanceStatus::Open)
        },
        tenant_name: "Jane Doe".into(),
        property_name: "Maple Court".into(),
    }
}

pub fn payment_at(amount: f64, created_at: DateTime<Utc>) -> PaymentWithTenant {
    PaymentWithTenant {
        payment: Payment {
            id: Uuid::new_v4(),
            tenant_id: Uuid::nil(),
            amount,
            status: PaymentStatus::Paid,
            created_at,
        },
        tenant_name: "Jane Doe".into(),
    }
}

pub fn document(property_id: Id) -> Document {
    Document {
        id: Uuid::new_v4(),
        property_id,
        tenant_id: None,
        name: "Lease".into(),
        document_type: DocumentType::Lease,
        category: DocumentCategory::Tenant,
        url: "/uploads/x/lease.pdf".into(),
        file_size: 2048,
        mime_type: "application/pdf".into(),
        created_at: epoch(),
        updated_at: epoch(),
    }
}
