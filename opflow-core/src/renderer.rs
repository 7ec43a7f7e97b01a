use crate::errors::ProcessError;
use crate::node::{OperatorId, UnitId};
use crate::operator::Operator;
use crate::process::Process;
use opflow_types::models::process::RectDefinition;
use std::collections::HashMap;

pub const OPERATOR_WIDTH: f64 = 90.0;
pub const OPERATOR_MIN_HEIGHT: f64 = 68.0;
/// Height of the operator title bar.
pub const HEADER_HEIGHT: f64 = 23.0;
/// Vertical distance between two ports.
pub const PORT_OFFSET: f64 = 15.0;

const GRID_X: f64 = 135.0;
const MARGIN_X: f64 = 45.0;
const MARGIN_Y: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl From<RectDefinition> for Rect {
    fn from(rect: RectDefinition) -> Self {
        Self {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
        }
    }
}

impl From<Rect> for RectDefinition {
    fn from(rect: Rect) -> Self {
        Self {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
        }
    }
}

/// Height an operator needs to show all of its ports.
pub fn operator_height(operator: &Operator) -> f64 {
    let ports = operator
        .input_ports()
        .len()
        .max(operator.output_ports().len());
    (HEADER_HEIGHT + ports as f64 * PORT_OFFSET).max(OPERATOR_MIN_HEIGHT)
}

#[derive(Debug, Default, Clone)]
/// What a process view needs besides the process itself: operator bounding boxes, the
/// selection and the unit on display.
pub struct ProcessRendererModel {
    rects: HashMap<OperatorId, Rect>,
    selection: Vec<OperatorId>,
    displayed_unit: Option<UnitId>,
}

impl ProcessRendererModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn operator_rect(&self, operator: OperatorId) -> Option<Rect> {
        self.rects.get(&operator).copied()
    }

    pub fn set_operator_rect(&mut self, operator: OperatorId, rect: Rect) {
        self.rects.insert(operator, rect);
    }

    /// Forgets everything about an operator that left the process.
    pub fn forget_operator(&mut self, operator: OperatorId) {
        self.rects.remove(&operator);
        self.selection.retain(|selected| *selected != operator);
    }

    pub fn selected_operators(&self) -> &[OperatorId] {
        &self.selection
    }

    pub fn set_selection(&mut self, selection: Vec<OperatorId>) {
        self.selection = selection;
    }

    pub fn displayed_unit(&self) -> Option<UnitId> {
        self.displayed_unit
    }

    /// Selects only `operator` and displays the unit it is part of.
    pub fn select_and_show(&mut self, process: &Process, operator: OperatorId) -> Result<(), ProcessError> {
        let parent = process.operator(operator)?.parent();
        self.selection = vec![operator];
        if parent.is_some() {
            self.displayed_unit = parent;
        }
        Ok(())
    }

    /// Position an operator gets when nothing was stored for it.
    pub fn default_rect(operator: &Operator, index: usize) -> Rect {
        Rect {
            x: MARGIN_X + index as f64 * GRID_X,
            y: MARGIN_Y,
            width: OPERATOR_WIDTH,
            height: operator_height(operator),
        }
    }

    /// Gives every operator of the process without a bounding box a default one.
    pub fn ensure_layout(&mut self, process: &Process) -> Result<(), ProcessError> {
        for id in process.subtree(process.root())? {
            let operator = process.operator(id)?;
            let Some(parent) = operator.parent() else {
                continue;
            };
            if self.rects.contains_key(&id) {
                continue;
            }
            let index = process.unit(parent)?.index_of(id).unwrap_or_default();
            self.rects.insert(id, Self::default_rect(operator, index));
        }
        Ok(())
    }
}
