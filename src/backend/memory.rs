// ABOUTME: In-process RecordStore with PocketBase-compatible filters, sorting, expansion, and auth
// ABOUTME: Backs local development (POCKETBASE_URL=memory://) and the integration tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! In-memory record store
//!
//! The schema is fixed to the four collections the service uses. Relations
//! are declared once in [`RELATIONS`]; the same table drives forward
//! expansion, back-relation expansion, and cascade deletes.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use pressroom_core::constants::{collections, fields};
use rand::Rng;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::cmp::Ordering;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use super::filter::{self, Filter};
use super::{
    build_file_url, AuthResponse, BackendError, BackendHealth, ListResult, QueryOptions, Record,
    RecordStore,
};

/// `(collection, field, target collection)` for every relation field
const RELATIONS: &[(&str, &str, &str)] = &[
    (collections::ARTICLES, fields::USER, collections::USERS),
    (collections::MESSAGES, fields::ARTICLE, collections::ARTICLES),
    (collections::REACTIONS, fields::ARTICLE, collections::ARTICLES),
    (collections::REACTIONS, fields::USER, collections::USERS),
];

const ID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const ID_LENGTH: usize = 15;
const MIN_PASSWORD_LENGTH: usize = 8;

const PASSWORD_HASH: &str = "passwordHash";
const PASSWORD_SALT: &str = "passwordSalt";
const HIDDEN_FIELDS: &[&str] = &[PASSWORD_HASH, PASSWORD_SALT];
const SYSTEM_FIELDS: &[&str] = &["id", "created", "updated", "collectionId", "collectionName"];

type Fields = Map<String, Value>;

#[derive(Debug, Clone)]
struct Session {
    collection: String,
    record_id: String,
}

#[derive(Debug, Default)]
struct MemoryState {
    collections: HashMap<String, Vec<Fields>>,
    sessions: HashMap<String, Session>,
    last_timestamp: Option<DateTime<Utc>>,
}

/// In-process record store
pub struct MemoryStore {
    public_url: String,
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    /// Create an empty store; `public_url` is used for file URLs
    #[must_use]
    pub fn new(public_url: impl Into<String>) -> Self {
        let collections = [
            collections::USERS,
            collections::ARTICLES,
            collections::MESSAGES,
            collections::REACTIONS,
        ]
        .into_iter()
        .map(|name| (name.to_owned(), Vec::new()))
        .collect();

        Self {
            public_url: public_url.into(),
            state: RwLock::new(MemoryState {
                collections,
                ..MemoryState::default()
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new("http://127.0.0.1:8090")
    }
}

impl MemoryState {
    fn records(&self, collection: &str) -> Result<&Vec<Fields>, BackendError> {
        self.collections
            .get(collection)
            .ok_or(BackendError::NotFound)
    }

    fn records_mut(&mut self, collection: &str) -> Result<&mut Vec<Fields>, BackendError> {
        self.collections
            .get_mut(collection)
            .ok_or(BackendError::NotFound)
    }

    fn find(&self, collection: &str, id: &str) -> Option<&Fields> {
        self.collections
            .get(collection)?
            .iter()
            .find(|record| id_of(record) == id)
    }

    /// Strictly increasing timestamps keep `-created` / `-updated` sorts deterministic
    fn next_timestamp(&mut self) -> String {
        let mut now = Utc::now();
        if let Some(last) = self.last_timestamp {
            if now <= last {
                now = last + Duration::milliseconds(1);
            }
        }
        self.last_timestamp = Some(now);
        now.format("%Y-%m-%d %H:%M:%S%.3fZ").to_string()
    }

    fn generate_id(&self, collection: &str) -> String {
        let mut rng = rand::thread_rng();
        loop {
            let id: String = (0..ID_LENGTH)
                .map(|_| char::from(ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())]))
                .collect();
            if self.find(collection, &id).is_none() {
                return id;
            }
        }
    }

    /// Public view of a record with requested relations inlined
    fn expanded(&self, collection: &str, record: &Fields, expand: Option<&str>) -> Fields {
        let mut output = public_fields(record);
        let Some(expand) = expand else {
            return output;
        };

        let mut expansions = Map::new();
        for part in expand.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            if let Some((child, field)) = parse_back_relation(part) {
                let related: Vec<Value> = self
                    .collections
                    .get(child)
                    .into_iter()
                    .flatten()
                    .filter(|candidate| str_field(candidate, field) == Some(id_of(record)))
                    .map(|candidate| Value::Object(public_fields(candidate)))
                    .collect();
                if !related.is_empty() {
                    expansions.insert(part.to_owned(), Value::Array(related));
                }
            } else if let Some(target) = relation_target(collection, part) {
                let related = str_field(record, part).and_then(|id| self.find(target, id));
                if let Some(related) = related {
                    expansions.insert(part.to_owned(), Value::Object(public_fields(related)));
                }
            }
        }

        if !expansions.is_empty() {
            output.insert("expand".to_owned(), Value::Object(expansions));
        }
        output
    }

    fn to_record(
        &self,
        collection: &str,
        record: &Fields,
        options: &QueryOptions,
    ) -> Result<Record, BackendError> {
        serde_json::from_value(Value::Object(self.expanded(
            collection,
            record,
            options.expand.as_deref(),
        )))
        .map_err(|e| BackendError::Decode(e.to_string()))
    }

    /// Delete a record and, recursively, everything pointing at it
    fn cascade_delete(&mut self, collection: &str, id: &str) {
        for (child, field, target) in RELATIONS {
            if *target != collection {
                continue;
            }
            let dependents: Vec<String> = self
                .collections
                .get(*child)
                .into_iter()
                .flatten()
                .filter(|record| str_field(record, field) == Some(id))
                .map(|record| id_of(record).to_owned())
                .collect();
            for dependent in dependents {
                self.cascade_delete(child, &dependent);
            }
        }

        if let Some(records) = self.collections.get_mut(collection) {
            records.retain(|record| id_of(record) != id);
        }
        self.sessions
            .retain(|_, session| !(session.collection == collection && session.record_id == id));
    }

    /// Enforce unique email / nickname on users
    fn check_user_uniqueness(
        &self,
        candidate: &Fields,
        own_id: Option<&str>,
    ) -> Result<(), BackendError> {
        let mut invalid = Vec::new();
        let users = self.records(collections::USERS)?;
        for field in [fields::EMAIL, fields::NICKNAME] {
            let Some(value) = str_field(candidate, field) else {
                continue;
            };
            let taken = users.iter().any(|user| {
                Some(id_of(user)) != own_id
                    && str_field(user, field)
                        .is_some_and(|existing| existing.eq_ignore_ascii_case(value))
            });
            if taken {
                invalid.push(field.to_owned());
            }
        }
        let malformed_email =
            str_field(candidate, fields::EMAIL).is_some_and(|email| !email.contains('@'));
        if malformed_email && !invalid.iter().any(|field| field == fields::EMAIL) {
            invalid.push(fields::EMAIL.to_owned());
        }

        if invalid.is_empty() {
            Ok(())
        } else {
            Err(validation_error(invalid))
        }
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get_one(
        &self,
        collection: &str,
        id: &str,
        options: &QueryOptions,
    ) -> Result<Record, BackendError> {
        let state = self.state.read().await;
        let record = state.find(collection, id).ok_or(BackendError::NotFound)?;
        state.to_record(collection, record, options)
    }

    async fn get_list(
        &self,
        collection: &str,
        page: u32,
        per_page: u32,
        options: &QueryOptions,
    ) -> Result<ListResult<Record>, BackendError> {
        let filter = options.filter.as_deref().map(Filter::parse).transpose()?;
        let state = self.state.read().await;

        let mut matching: Vec<&Fields> = state
            .records(collection)?
            .iter()
            .filter(|record| {
                filter
                    .as_ref()
                    .is_none_or(|filter| filter.matches(&public_fields(record)))
            })
            .collect();

        if let Some(sort) = options.sort.as_deref() {
            let keys = parse_sort(sort);
            matching.sort_by(|a, b| compare_by(a, b, &keys));
        }

        let page = page.max(1);
        let per_page = per_page.max(1);
        let total_items = matching.len() as u64;
        let total_pages = matching.len().div_ceil(per_page as usize) as u32;
        let start = (page as usize - 1).saturating_mul(per_page as usize);

        let items = matching
            .into_iter()
            .skip(start)
            .take(per_page as usize)
            .map(|record| state.to_record(collection, record, options))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ListResult {
            page,
            per_page,
            total_items,
            total_pages,
            items,
        })
    }

    async fn create(
        &self,
        collection: &str,
        body: Value,
        options: &QueryOptions,
    ) -> Result<Record, BackendError> {
        let Value::Object(mut input) = body else {
            return Err(validation_error(Vec::new()));
        };

        let mut state = self.state.write().await;
        state.records(collection)?;

        if collection == collections::USERS {
            prepare_new_user(&mut input)?;
            state.check_user_uniqueness(&input, None)?;
        }

        let id = match str_field(&input, "id") {
            Some(requested) if state.find(collection, requested).is_some() => {
                return Err(validation_error(vec!["id".to_owned()]));
            }
            Some(requested) => requested.to_owned(),
            None => state.generate_id(collection),
        };
        let timestamp = state.next_timestamp();

        let mut record = Fields::new();
        record.insert("id".to_owned(), Value::String(id.clone()));
        record.insert("collectionId".to_owned(), Value::String(collection.to_owned()));
        record.insert("collectionName".to_owned(), Value::String(collection.to_owned()));
        record.insert("created".to_owned(), Value::String(timestamp.clone()));
        record.insert("updated".to_owned(), Value::String(timestamp));
        for (key, value) in input {
            if !SYSTEM_FIELDS.contains(&key.as_str()) {
                record.insert(key, value);
            }
        }

        debug!(collection, id = %id, "Created in-memory record");
        state.records_mut(collection)?.push(record);
        let stored = state.find(collection, &id).ok_or(BackendError::NotFound)?;
        state.to_record(collection, stored, options)
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        body: Value,
        options: &QueryOptions,
    ) -> Result<Record, BackendError> {
        let Value::Object(mut patch) = body else {
            return Err(validation_error(Vec::new()));
        };

        let mut state = self.state.write().await;
        if state.find(collection, id).is_none() {
            return Err(BackendError::NotFound);
        }

        for key in SYSTEM_FIELDS.iter().chain(HIDDEN_FIELDS) {
            patch.remove(*key);
        }
        if collection == collections::USERS {
            if patch.contains_key("password") {
                prepare_new_user_password(&mut patch)?;
            }
            state.check_user_uniqueness(&patch, Some(id))?;
        }

        let timestamp = state.next_timestamp();
        let record = state
            .records_mut(collection)?
            .iter_mut()
            .find(|record| id_of(record) == id)
            .ok_or(BackendError::NotFound)?;
        for (key, value) in patch {
            record.insert(key, value);
        }
        record.insert("updated".to_owned(), Value::String(timestamp));

        let stored = state.find(collection, id).ok_or(BackendError::NotFound)?;
        state.to_record(collection, stored, options)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, BackendError> {
        let mut state = self.state.write().await;
        if state.find(collection, id).is_none() {
            return Err(BackendError::NotFound);
        }
        state.cascade_delete(collection, id);
        debug!(collection, id, "Deleted in-memory record");
        Ok(true)
    }

    async fn auth_with_password(
        &self,
        collection: &str,
        identity: &str,
        password: &str,
    ) -> Result<AuthResponse, BackendError> {
        let rejected = || BackendError::Unauthorized("Failed to authenticate.".to_owned());

        let mut state = self.state.write().await;
        let user = state
            .records(collection)?
            .iter()
            .find(|user| {
                str_field(user, fields::EMAIL)
                    .is_some_and(|email| email.eq_ignore_ascii_case(identity))
            })
            .ok_or_else(rejected)?;

        let salt = str_field(user, PASSWORD_SALT).unwrap_or_default();
        if str_field(user, PASSWORD_HASH) != Some(hash_password(salt, password).as_str()) {
            return Err(rejected());
        }

        let record_id = id_of(user).to_owned();
        let record = state.to_record(collection, user, &QueryOptions::new())?;
        let token = generate_token();
        state.sessions.insert(
            token.clone(),
            Session {
                collection: collection.to_owned(),
                record_id,
            },
        );
        Ok(AuthResponse { token, record })
    }

    async fn auth_refresh(
        &self,
        collection: &str,
        token: &str,
    ) -> Result<AuthResponse, BackendError> {
        let state = self.state.read().await;
        let invalid = || {
            BackendError::Unauthorized(
                "The request requires valid record authorization token.".to_owned(),
            )
        };

        let session = state.sessions.get(token).ok_or_else(invalid)?;
        if session.collection != collection {
            return Err(invalid());
        }
        let user = state
            .find(collection, &session.record_id)
            .ok_or_else(invalid)?;

        Ok(AuthResponse {
            token: token.to_owned(),
            record: state.to_record(collection, user, &QueryOptions::new())?,
        })
    }

    async fn health(&self) -> Result<BackendHealth, BackendError> {
        Ok(BackendHealth {
            code: 200,
            message: "API is healthy.".to_owned(),
        })
    }

    fn file_url(&self, collection: &str, record_id: &str, filename: &str) -> String {
        build_file_url(&self.public_url, collection, record_id, filename)
    }
}

fn id_of(record: &Fields) -> &str {
    str_field(record, "id").unwrap_or_default()
}

fn str_field<'a>(record: &'a Fields, field: &str) -> Option<&'a str> {
    record
        .get(field)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
}

fn public_fields(record: &Fields) -> Fields {
    let mut output = record.clone();
    for hidden in HIDDEN_FIELDS {
        output.remove(*hidden);
    }
    output
}

fn relation_target(collection: &str, field: &str) -> Option<&'static str> {
    RELATIONS
        .iter()
        .find(|(owner, name, _)| *owner == collection && *name == field)
        .map(|(_, _, target)| *target)
}

/// `messages(article)` → `("messages", "article")`
fn parse_back_relation(part: &str) -> Option<(&str, &str)> {
    let (collection, rest) = part.split_once('(')?;
    let field = rest.strip_suffix(')')?;
    Some((collection.trim(), field.trim()))
}

fn parse_sort(sort: &str) -> Vec<(String, bool)> {
    sort.split(',')
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(|key| match key.strip_prefix('-') {
            Some(field) => (field.to_owned(), true),
            None => (key.trim_start_matches('+').to_owned(), false),
        })
        .collect()
}

fn compare_by(a: &Fields, b: &Fields, keys: &[(String, bool)]) -> Ordering {
    for (field, descending) in keys {
        let left = a.get(field).unwrap_or(&Value::Null);
        let right = b.get(field).unwrap_or(&Value::Null);
        let ordering = filter::order(left, right).unwrap_or(Ordering::Equal);
        let ordering = if *descending { ordering.reverse() } else { ordering };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

fn validation_error(fields: Vec<String>) -> BackendError {
    BackendError::Validation {
        message: "Failed to create record.".to_owned(),
        fields,
    }
}

fn prepare_new_user(input: &mut Fields) -> Result<(), BackendError> {
    let mut invalid = Vec::new();
    if str_field(input, fields::EMAIL).is_none() {
        invalid.push(fields::EMAIL.to_owned());
    }
    if let Err(BackendError::Validation { fields, .. }) = prepare_new_user_password(input) {
        invalid.extend(fields);
    }
    if !invalid.is_empty() {
        return Err(validation_error(invalid));
    }

    input.remove("terms");
    input
        .entry(fields::VERIFIED)
        .or_insert(Value::Bool(false));
    Ok(())
}

/// Replace `password` / `passwordConfirm` with a salted hash
fn prepare_new_user_password(input: &mut Fields) -> Result<(), BackendError> {
    let password = input
        .remove("password")
        .and_then(|value| value.as_str().map(str::to_owned))
        .unwrap_or_default();
    let confirm = input
        .remove("passwordConfirm")
        .and_then(|value| value.as_str().map(str::to_owned));

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(validation_error(vec!["password".to_owned()]));
    }
    if confirm.is_some_and(|confirm| confirm != password) {
        return Err(validation_error(vec!["passwordConfirm".to_owned()]));
    }

    let salt = generate_token();
    input.insert(
        PASSWORD_HASH.to_owned(),
        Value::String(hash_password(&salt, &password)),
    );
    input.insert(PASSWORD_SALT.to_owned(), Value::String(salt));
    Ok(())
}

fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

fn generate_token() -> String {
    let bytes: [u8; 32] = rand::thread_rng().gen();
    hex::encode(bytes)
}
