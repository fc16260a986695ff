use core::convert::Infallible;

use alloy_primitives::{Address, Bytes, B256, U256};
use delegate::delegate;
use revm::{
    database::{CacheDB, DbAccount, EmptyDB},
    primitives::{StorageKey, StorageValue},
    state::{AccountInfo, Bytecode},
};

/// An in-memory database standing in for a fork.
#[derive(Debug, Default, Clone, derive_more::Deref, derive_more::DerefMut)]
pub struct MemoryDatabase {
    #[deref]
    #[deref_mut]
    db: CacheDB<EmptyDB>,
}

impl MemoryDatabase {
    /// Applies `edit` to the account at `address`, creating it when missing.
    fn with_account(mut self, address: Address, edit: impl FnOnce(&mut AccountInfo)) -> Self {
        let mut info =
            self.account(address).map(|account| account.info.clone()).unwrap_or_default();
        edit(&mut info);
        self.db.insert_account_info(address, info);
        self
    }

    fn account(&self, address: Address) -> Option<&DbAccount> {
        self.db.cache.accounts.get(&address)
    }

    /// Deploys `code` at `address`.
    pub fn account_code(self, address: Address, code: Bytes) -> Self {
        self.with_account(address, |info| {
            let bytecode = Bytecode::new_legacy(code);
            info.code_hash = bytecode.hash_slow();
            info.code = Some(bytecode);
        })
    }

    /// Funds `address` with `balance`.
    pub fn account_balance(self, address: Address, balance: U256) -> Self {
        self.with_account(address, |info| info.balance = balance)
    }

    /// Sets the nonce of `address`.
    pub fn account_nonce(self, address: Address, nonce: u64) -> Self {
        self.with_account(address, |info| info.nonce = nonce)
    }

    /// Balance of an account, zero when unknown.
    pub fn balance_of(&self, address: Address) -> U256 {
        self.account(address).map(|account| account.info.balance).unwrap_or_default()
    }

    /// Nonce of an account, zero when unknown.
    pub fn nonce_of(&self, address: Address) -> u64 {
        self.account(address).map(|account| account.info.nonce).unwrap_or_default()
    }

    /// Value of a storage slot, zero when unknown.
    pub fn storage_of(&self, address: Address, slot: StorageKey) -> StorageValue {
        self.account(address)
            .and_then(|account| account.storage.get(&slot).copied())
            .unwrap_or_default()
    }
}

impl revm::Database for MemoryDatabase {
    type Error = Infallible;

    delegate! {
        to self.db {
            fn basic(&mut self, address: Address) -> Result<Option<AccountInfo>, Self::Error>;
            fn code_by_hash(&mut self, code_hash: B256) -> Result<Bytecode, Self::Error>;
            fn storage(
                &mut self,
                address: Address,
                index: StorageKey,
            ) -> Result<StorageValue, Self::Error>;
            fn block_hash(&mut self, number: u64) -> Result<B256, Self::Error>;
        }
    }
}

impl revm::DatabaseCommit for MemoryDatabase {
    delegate! {
        to self.db {
            fn commit(&mut self, changes: revm::primitives::HashMap<Address, revm::state::Account>);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use revm::{primitives::KECCAK_EMPTY, Database};

    const ACCOUNT: Address = Address::repeat_byte(0x33);

    #[test]
    fn test_builders_edit_the_same_account() {
        let code = Bytes::from_static(&[0x60, 0x00]);
        let mut db = MemoryDatabase::default()
            .account_balance(ACCOUNT, U256::from(7))
            .account_nonce(ACCOUNT, 3)
            .account_code(ACCOUNT, code.clone());

        assert_eq!(db.balance_of(ACCOUNT), U256::from(7));
        assert_eq!(db.nonce_of(ACCOUNT), 3);
        let info = db.basic(ACCOUNT).unwrap().unwrap();
        let bytecode = Bytecode::new_legacy(code);
        assert_eq!(info.code_hash, bytecode.hash_slow());
        assert_eq!(db.code_by_hash(info.code_hash).unwrap(), bytecode);
    }

    #[test]
    fn test_unknown_account_reads_as_empty() {
        let mut db = MemoryDatabase::default();
        assert_eq!(db.balance_of(ACCOUNT), U256::ZERO);
        assert_eq!(db.storage_of(ACCOUNT, StorageKey::from(1)), StorageValue::ZERO);
        let info = db.basic(ACCOUNT).unwrap().unwrap_or_default();
        assert_eq!(info.code_hash, KECCAK_EMPTY);
    }
}
