use alloc::vec::Vec;
use core::alloc::Layout;

use crate::{Error, ErrorCode};

#[inline]
fn check_reserve_len<T>(len: usize, additional: usize, offset: usize) -> Result<(), Error> {
    let needed = len
        .checked_add(additional)
        .ok_or_else(|| Error::new(ErrorCode::LengthOverflow, offset))?;
    Layout::array::<T>(needed).map_err(|_| Error::new(ErrorCode::LengthOverflow, offset))?;
    Ok(())
}

#[inline]
pub fn alloc_failed(offset: usize) -> Error {
    Error::new(ErrorCode::AllocationFailed, offset)
}

#[inline]
pub fn try_reserve_exact<T>(v: &mut Vec<T>, additional: usize, offset: usize) -> Result<(), Error> {
    let needed = v
        .len()
        .checked_add(additional)
        .ok_or_else(|| Error::new(ErrorCode::LengthOverflow, offset))?;
    if needed <= v.capacity() {
        return Ok(());
    }
    check_reserve_len::<T>(v.len(), additional, offset)?;
    v.try_reserve_exact(additional).map_err(|_| alloc_failed(offset))
}

#[inline]
pub fn try_reserve<T>(v: &mut Vec<T>, additional: usize, offset: usize) -> Result<(), Error> {
    let needed = v
        .len()
        .checked_add(additional)
        .ok_or_else(|| Error::new(ErrorCode::LengthOverflow, offset))?;
    if needed <= v.capacity() {
        return Ok(());
    }
    check_reserve_len::<T>(v.len(), additional, offset)?;
    v.try_reserve(additional).map_err(|_| alloc_failed(offset))
}

#[inline]
pub fn try_push<T>(v: &mut Vec<T>, item: T, offset: usize) -> Result<(), Error> {
    try_reserve(v, 1, offset)?;
    v.push(item);
    Ok(())
}

#[inline]
pub fn try_vec_from_slice(bytes: &[u8], offset: usize) -> Result<Vec<u8>, Error> {
    let mut v = Vec::new();
    try_reserve_exact(&mut v, bytes.len(), offset)?;
    v.extend_from_slice(bytes);
    Ok(v)
}

#[inline]
pub fn try_vec_with_capacity<T>(cap: usize, offset: usize) -> Result<Vec<T>, Error> {
    let mut v: Vec<T> = Vec::new();
    try_reserve_exact(&mut v, cap, offset)?;
    Ok(v)
}
