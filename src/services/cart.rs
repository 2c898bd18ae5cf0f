// src/services/cart.rs

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::orders::{CartQuote, QuoteLine},
    services::ledger::Ledger,
};

/// Caixas pedidas por item, na ordem em que foram adicionadas.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<(Uuid, i32)>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a quantidade de um item; zero remove a linha.
    pub fn set(&mut self, item_id: Uuid, boxes: i32) -> Result<(), AppError> {
        if boxes < 0 {
            return Err(AppError::InvalidQuantity);
        }
        if boxes == 0 {
            self.remove(item_id);
            return Ok(());
        }
        match self.lines.iter_mut().find(|(id, _)| *id == item_id) {
            Some(line) => line.1 = boxes,
            None => self.lines.push((item_id, boxes)),
        }
        Ok(())
    }

    /// Soma caixas à linha do item.
    pub fn add(&mut self, item_id: Uuid, boxes: i32) -> Result<(), AppError> {
        if boxes <= 0 {
            return Err(AppError::InvalidQuantity);
        }
        let current = self.quantity(item_id);
        let next = current.checked_add(boxes).ok_or(AppError::InvalidQuantity)?;
        self.set(item_id, next)
    }

    pub fn remove(&mut self, item_id: Uuid) {
        self.lines.retain(|(id, _)| *id != item_id);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn quantity(&self, item_id: Uuid) -> i32 {
        self.lines
            .iter()
            .find(|(id, _)| *id == item_id)
            .map(|(_, q)| *q)
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn lines(&self) -> impl Iterator<Item = (Uuid, i32)> + '_ {
        self.lines.iter().copied()
    }
}

/// Total do carrinho com os custos atuais do snapshot.
pub fn quote(cart: &Cart, ledger: &Ledger, minimum_total: Decimal) -> Result<CartQuote, AppError> {
    if cart.is_empty() {
        return Err(AppError::EmptyCart);
    }

    let mut lines = Vec::with_capacity(cart.len());
    for (item_id, boxes) in cart.lines() {
        let item = ledger.find(item_id).ok_or(AppError::ItemNotFound)?;
        let line_total = Decimal::from(boxes)
            .checked_mul(item.unit_cost)
            .ok_or_else(|| anyhow::anyhow!("Valor da linha estoura o Decimal (item {})", item_id))?;
        lines.push(QuoteLine {
            item_id,
            code: item.code.clone(),
            description: item.description.clone(),
            boxes,
            unit_cost: item.unit_cost,
            line_total,
        });
    }

    let total = lines
        .iter()
        .try_fold(Decimal::ZERO, |acc, l| acc.checked_add(l.line_total))
        .ok_or_else(|| anyhow::anyhow!("Total do carrinho estoura o Decimal"))?;
    Ok(CartQuote {
        lines,
        total,
        minimum_total,
        below_minimum: total < minimum_total,
    })
}
