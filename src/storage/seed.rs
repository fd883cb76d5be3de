// src/storage/seed.rs
//! Demo agents and the default pre-chat form.

use super::MemoryStore;
use crate::models::agent::NewAgent;
use crate::models::form_field::{FieldType, NewFormField};
use bcrypt::hash;
use serde_json::json;

pub const DEMO_PASSWORD: &str = "password123";

pub async fn seed_default_data(store: &MemoryStore, bcrypt_cost: u32) -> Result<(), bcrypt::BcryptError> {
    seed_agents(store, bcrypt_cost).await?;
    seed_form_fields(store).await;
    Ok(())
}

async fn seed_agents(store: &MemoryStore, bcrypt_cost: u32) -> Result<(), bcrypt::BcryptError> {
    let password_hash = hash(DEMO_PASSWORD, bcrypt_cost)?;

    let agents = [
        ("agent1@company.com", "Nguyễn Thị An", true),
        ("agent2@company.com", "Trần Văn Bình", false),
    ];

    for (email, name, is_online) in agents {
        let created = store
            .create_agent(NewAgent {
                email: email.to_string(),
                password_hash: password_hash.clone(),
                name: name.to_string(),
                is_online,
            })
            .await;

        match created {
            Ok(agent) => tracing::info!(agent_id = agent.id, email = %agent.email, "seeded agent"),
            Err(e) => tracing::warn!("Skipping seed agent: {}", e),
        }
    }

    Ok(())
}

async fn seed_form_fields(store: &MemoryStore) {
    let request_types = json!([
        { "value": "support", "label": "Hỗ trợ kỹ thuật" },
        { "value": "sales", "label": "Tư vấn bán hàng" },
        { "value": "complaint", "label": "Khiếu nại" }
    ]);

    let fields = [
        ("customerName", FieldType::Text, "Họ và tên", true, None, 1),
        ("customerPhone", FieldType::Text, "Số điện thoại", true, None, 2),
        ("customerAddress", FieldType::Text, "Địa chỉ", false, None, 3),
        ("requestType", FieldType::Select, "Loại yêu cầu", false, Some(request_types.to_string()), 4),
        ("content", FieldType::Textarea, "Nội dung", false, None, 5),
    ];

    for (field_name, field_type, label, required, options, order) in fields {
        store
            .create_form_field(NewFormField {
                field_name: field_name.to_string(),
                field_type,
                label: label.to_string(),
                required,
                options,
                order,
            })
            .await;
    }

    tracing::info!("seeded default pre-chat form");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TEST_BCRYPT_COST;

    #[tokio::test]
    async fn test_seed_creates_agents_and_form() {
        let store = MemoryStore::new();
        seed_default_data(&store, TEST_BCRYPT_COST).await.unwrap();

        let agents = store.list_agents().await;
        assert_eq!(agents.len(), 2);
        assert!(agents[0].is_online);
        assert!(!agents[1].is_online);
        assert!(bcrypt::verify(DEMO_PASSWORD, &agents[0].password_hash).unwrap());

        let fields = store.list_form_fields().await;
        assert_eq!(fields.len(), 5);
        assert_eq!(fields[0].field_name, "customerName");
        assert!(fields[0].required);

        let select = &fields[3];
        assert_eq!(select.field_type, FieldType::Select);
        let options: serde_json::Value =
            serde_json::from_str(select.options.as_deref().unwrap()).unwrap();
        assert_eq!(options.as_array().map(Vec::len), Some(3));
    }
}
