// Copyright (c) 2020 Google LLC All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Populating a target instance from a parsed model.

use {
    crate::{
        declare::Slot,
        error::ValueError,
        model::ParsedModel,
        spec::{Conversion, OptionKind, Specification},
        Bindable, FieldType,
    },
    tracing::{trace, warn},
};

impl<T: Bindable> Specification<T> {
    /// Assign every bound field of `target` from `model`.
    ///
    /// Fields whose value is absent from the model keep the value they have in
    /// `target`. Only `target` is modified.
    pub fn bind(&self, model: &dyn ParsedModel, target: &mut T) -> Result<(), ValueError> {
        for positional in &self.positionals {
            match model.positional_value(positional.display_name) {
                Some(token) => {
                    trace!(field = positional.field, token, "binding positional");
                    assign(
                        positional.field,
                        positional.ty,
                        &positional.conversion,
                        &*positional.slot,
                        target,
                        token,
                    )?;
                }
                None if positional.mandatory => warn!(
                    target_type = self.type_name,
                    field = positional.field,
                    "mandatory positional argument missing from the parsed model, keeping default"
                ),
                None => trace!(field = positional.field, "positional absent, keeping default"),
            }
        }

        for option in &self.options {
            match &option.kind {
                OptionKind::Switch => {
                    let present = model.is_present(option.key);
                    trace!(field = option.field, present, "binding switch");
                    option.slot.store(target, Box::new(present)).map_err(|_| ValueError::Assign {
                        field: option.field,
                        token: format!("-{}", option.key),
                        type_name: option.ty.name(),
                    })?;
                }
                OptionKind::Value(conversion) => match model.option_value(option.key) {
                    Some(token) => {
                        trace!(field = option.field, token, "binding option");
                        assign(option.field, option.ty, conversion, &*option.slot, target, token)?;
                    }
                    None => trace!(field = option.field, "option absent, keeping default"),
                },
            }
        }

        if let Some(tail) = &self.tail {
            let tokens = model.leftover_tokens();
            trace!(field = tail.field, count = tokens.len(), "binding variadic tail");
            let mut items = Vec::with_capacity(tokens.len());
            for token in tokens {
                let item = tail.adapter.parse(token).map_err(|message| ValueError::Conversion {
                    field: tail.field,
                    token: token.clone(),
                    type_name: tail.item.name(),
                    message,
                })?;
                items.push(item);
            }
            let collection = (tail.collect)(items).map_err(|position| ValueError::Assign {
                field: tail.field,
                token: tokens[position].clone(),
                type_name: tail.item.name(),
            })?;
            tail.slot.store(target, collection).map_err(|_| ValueError::Assign {
                field: tail.field,
                token: tokens.join(" "),
                type_name: tail.ty.name(),
            })?;
        }

        for field in &self.unannotated {
            trace!(field, "skipping unannotated field");
        }

        Ok(())
    }

    /// Bind a fresh, default-constructed `T` from `model`.
    pub fn bind_new(&self, model: &dyn ParsedModel) -> Result<T, ValueError> {
        let mut target = T::default();
        self.bind(model, &mut target)?;
        Ok(target)
    }
}

fn assign<T>(
    field: &'static str,
    ty: FieldType,
    conversion: &Conversion,
    slot: &dyn Slot<T>,
    target: &mut T,
    token: &str,
) -> Result<(), ValueError> {
    let value = conversion.convert(token).map_err(|message| ValueError::Conversion {
        field,
        token: token.to_string(),
        type_name: ty.name(),
        message,
    })?;
    slot.store(target, value).map_err(|_| ValueError::Assign {
        field,
        token: token.to_string(),
        type_name: ty.name(),
    })
}
