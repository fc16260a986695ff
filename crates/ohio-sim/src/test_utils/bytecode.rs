use alloy_primitives::{Bytes, U256};
use revm::bytecode::opcode::{ADD, MSTORE, PUSH0, RETURN, REVERT, SLOAD, SSTORE, STOP};

/// A builder for assembling contract bytecode.
#[derive(Debug, Default)]
pub struct BytecodeBuilder {
    code: Vec<u8>,
}

impl BytecodeBuilder {
    /// Builds the bytecode.
    pub fn build(self) -> Bytes {
        self.code.into()
    }

    /// Appends a single opcode or byte.
    pub fn append(mut self, opcode: u8) -> Self {
        self.code.push(opcode);
        self
    }

    /// Appends a series of opcodes or bytes.
    pub fn append_many(mut self, items: impl IntoIterator<Item = u8>) -> Self {
        self.code.extend(items);
        self
    }

    /// Appends a PUSH opcode and the bytes to push.
    pub fn push_bytes(mut self, bytes: impl AsRef<[u8]>) -> Self {
        let bytes = bytes.as_ref();
        assert!(bytes.len() <= 32);
        self.code.push(PUSH0 + bytes.len() as u8);
        self.code.extend_from_slice(bytes);
        self
    }

    /// Appends a PUSH of `number` in its shortest encoding.
    pub fn push_number(self, number: u64) -> Self {
        let bytes = number.to_be_bytes();
        let skip = bytes.iter().take_while(|b| **b == 0).count();
        self.push_bytes(&bytes[skip..])
    }

    /// Appends a PUSH32 of `value`.
    pub fn push_u256(self, value: U256) -> Self {
        self.push_bytes(value.to_be_bytes::<32>())
    }

    /// Stores `bytes` in memory at `offset`, one word at a time.
    pub fn mstore(self, offset: usize, bytes: impl AsRef<[u8]>) -> Self {
        let mut this = self;
        for (i, chunk) in bytes.as_ref().chunks(32).enumerate() {
            let mut word = [0u8; 32];
            word[..chunk.len()].copy_from_slice(chunk);
            this = this.push_bytes(word).push_number((offset + i * 32) as u64).append(MSTORE);
        }
        this
    }

    /// Stores `value` at `slot`.
    pub fn sstore(self, slot: u64, value: U256) -> Self {
        self.push_u256(value).push_number(slot).append(SSTORE)
    }

    /// Adds `delta` to the value at `slot`.
    pub fn sincrement(self, slot: u64, delta: u64) -> Self {
        self.push_number(delta)
            .push_number(slot)
            .append(SLOAD)
            .append(ADD)
            .push_number(slot)
            .append(SSTORE)
    }

    /// Appends a STOP.
    pub fn stop(self) -> Self {
        self.append(STOP)
    }

    /// Reverts with the given return data.
    pub fn revert_with_data(self, data: impl AsRef<[u8]>) -> Self {
        let len = data.as_ref().len() as u64;
        self.mstore(0, data).push_number(len).push_number(0).append(REVERT)
    }

    /// Returns the given data.
    pub fn return_with_data(self, data: impl AsRef<[u8]>) -> Self {
        let len = data.as_ref().len() as u64;
        self.mstore(0, data).push_number(len).push_number(0).append(RETURN)
    }
}
