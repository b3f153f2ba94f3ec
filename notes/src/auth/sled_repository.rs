use super::error::{AuthError, ConflictField};
use super::models::{Account, Note, NoteDraft};
use super::repository::{AccountRepository, NoteRepository};
use async_trait::async_trait;
use chrono::Utc;
use sled::transaction::{
    ConflictableTransactionError, TransactionError, TransactionResult, Transactional,
    TransactionalTree,
};
use sled::{Db, Tree};
use std::path::Path;

const ACCOUNTS_TREE: &str = "accounts";
const ACCOUNTS_BY_EMAIL_TREE: &str = "accounts_by_email";
const NOTES_TREE: &str = "notes";
const NOTES_BY_OWNER_TREE: &str = "notes_by_owner";

type TxResult<T> = Result<T, ConflictableTransactionError<AuthError>>;

/// Sled-backed store for accounts and notes.
///
/// Every write touching more than one tree runs in a single sled transaction,
/// so uniqueness checks, foreign-key checks and the cascade on account
/// deletion are evaluated against the same snapshot they write to.
#[derive(Clone)]
pub struct SledStore {
    db: Db,
    accounts: Tree,
    accounts_by_email: Tree,
    notes: Tree,
    notes_by_owner: Tree,
}

impl SledStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, AuthError> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AuthError::StorageError(format!("Failed to create directory: {}", e)))?;
        }

        Self::from_db(sled::open(path)?)
    }

    /// In-memory store that is discarded on drop
    pub fn temporary() -> Result<Self, AuthError> {
        Self::from_db(sled::Config::new().temporary(true).open()?)
    }

    fn from_db(db: Db) -> Result<Self, AuthError> {
        Ok(Self {
            accounts: db.open_tree(ACCOUNTS_TREE)?,
            accounts_by_email: db.open_tree(ACCOUNTS_BY_EMAIL_TREE)?,
            notes: db.open_tree(NOTES_TREE)?,
            notes_by_owner: db.open_tree(NOTES_BY_OWNER_TREE)?,
            db,
        })
    }

    async fn flush(&self) -> Result<(), AuthError> {
        self.db.flush_async().await?;
        Ok(())
    }

    fn next_note_id(&self) -> Result<u64, AuthError> {
        // Ids start at 1 and are never handed out twice, even across restarts.
        Ok(self.db.generate_id()? + 1)
    }
}

fn note_key(id: u64) -> Vec<u8> {
    id.to_be_bytes().to_vec()
}

fn email_key(email: &str) -> Vec<u8> {
    email.trim().to_lowercase().into_bytes()
}

fn abort<T>(err: AuthError) -> TxResult<T> {
    Err(ConflictableTransactionError::Abort(err))
}

fn encode<T: serde::Serialize>(value: &T) -> TxResult<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| ConflictableTransactionError::Abort(e.into()))
}

fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> TxResult<T> {
    serde_json::from_slice(bytes).map_err(|e| ConflictableTransactionError::Abort(e.into()))
}

fn owned_ids(index: &TransactionalTree, owner: &str) -> TxResult<Vec<u64>> {
    match index.get(owner.as_bytes())? {
        Some(bytes) => decode(&bytes),
        None => Ok(Vec::new()),
    }
}

fn finish<T>(result: TransactionResult<T, AuthError>) -> Result<T, AuthError> {
    result.map_err(|err| match err {
        TransactionError::Abort(e) => e,
        TransactionError::Storage(e) => e.into(),
    })
}

#[async_trait]
impl AccountRepository for SledStore {
    async fn create(&self, account: Account) -> Result<Account, AuthError> {
        let account_json = serde_json::to_vec(&account)?;
        let email = email_key(&account.email);

        let result = (&self.accounts, &self.accounts_by_email).transaction(|(accounts, emails)| {
            // No check-then-insert outside the transaction: the check and the
            // insert commit together or not at all.
            if accounts.get(account.identifier.as_bytes())?.is_some() {
                return abort(AuthError::Conflict(ConflictField::Identifier));
            }
            if emails.get(email.as_slice())?.is_some() {
                return abort(AuthError::Conflict(ConflictField::Email));
            }

            accounts.insert(account.identifier.as_bytes(), account_json.as_slice())?;
            emails.insert(email.as_slice(), account.identifier.as_bytes())?;
            Ok(())
        });

        finish(result)?;
        self.flush().await?;
        Ok(account)
    }

    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<Account>, AuthError> {
        match self.accounts.get(identifier.as_bytes())? {
            Some(data) => Ok(Some(serde_json::from_slice(&data)?)),
            None => Ok(None),
        }
    }

    async fn delete_cascade(&self, identifier: &str) -> Result<usize, AuthError> {
        let result = (
            &self.accounts,
            &self.accounts_by_email,
            &self.notes,
            &self.notes_by_owner,
        )
            .transaction(|(accounts, emails, notes, by_owner)| {
                let Some(data) = accounts.get(identifier.as_bytes())? else {
                    return abort(AuthError::AccountNotFound);
                };
                let account: Account = decode(&data)?;

                // Scope of the cascade: exactly the ids indexed under this owner.
                let ids = owned_ids(by_owner, identifier)?;
                for id in &ids {
                    notes.remove(note_key(*id))?;
                }
                by_owner.remove(identifier.as_bytes())?;

                emails.remove(email_key(&account.email))?;
                accounts.remove(identifier.as_bytes())?;

                Ok(ids.len())
            });

        let removed = finish(result)?;
        self.flush().await?;
        Ok(removed)
    }
}

#[async_trait]
impl NoteRepository for SledStore {
    async fn create(&self, owner: &str, draft: NoteDraft) -> Result<Note, AuthError> {
        let note = Note::new(self.next_note_id()?, owner.to_string(), draft.title, draft.body);
        let note_json = serde_json::to_vec(&note)?;

        let result = (&self.accounts, &self.notes, &self.notes_by_owner).transaction(
            |(accounts, notes, by_owner)| {
                if accounts.get(owner.as_bytes())?.is_none() {
                    return abort(AuthError::AccountNotFound);
                }

                let mut ids = owned_ids(by_owner, owner)?;
                ids.push(note.id);

                notes.insert(note_key(note.id), note_json.as_slice())?;
                by_owner.insert(owner.as_bytes(), encode(&ids)?)?;
                Ok(())
            },
        );

        finish(result)?;
        self.flush().await?;
        Ok(note)
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<Note>, AuthError> {
        match self.notes.get(note_key(id))? {
            Some(data) => Ok(Some(serde_json::from_slice(&data)?)),
            None => Ok(None),
        }
    }

    async fn list_by_owner(&self, owner: &str) -> Result<Vec<Note>, AuthError> {
        let ids: Vec<u64> = match self.notes_by_owner.get(owner.as_bytes())? {
            Some(data) => serde_json::from_slice(&data)?,
            None => return Ok(Vec::new()),
        };

        let mut notes = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(note) = self.find_by_id(id).await? {
                notes.push(note);
            }
        }
        notes.sort_by_key(|note| note.id);

        Ok(notes)
    }

    async fn update(&self, id: u64, draft: NoteDraft) -> Result<Note, AuthError> {
        let result = self.notes.transaction(|notes| {
            let Some(data) = notes.get(note_key(id))? else {
                return abort(AuthError::NoteNotFound);
            };

            let mut note: Note = decode(&data)?;
            note.title = draft.title.clone();
            note.body = draft.body.clone();
            note.updated_at = Utc::now();

            notes.insert(note_key(id), encode(&note)?)?;
            Ok(note)
        });

        let note = finish(result)?;
        self.flush().await?;
        Ok(note)
    }

    async fn delete(&self, id: u64) -> Result<(), AuthError> {
        let result = (&self.notes, &self.notes_by_owner).transaction(|(notes, by_owner)| {
            let Some(data) = notes.remove(note_key(id))? else {
                return abort(AuthError::NoteNotFound);
            };
            let note: Note = decode(&data)?;

            let mut ids = owned_ids(by_owner, &note.owner)?;
            ids.retain(|owned| *owned != id);
            by_owner.insert(note.owner.as_bytes(), encode(&ids)?)?;
            Ok(())
        });

        finish(result)?;
        self.flush().await?;
        Ok(())
    }
}
