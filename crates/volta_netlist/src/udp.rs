//! User-defined primitives: truth tables and sequential state tables.
//!
//! A combinational UDP maps ground input patterns to an output level. A
//! sequential UDP is a state machine keyed by the full pin string (first
//! character = current output); each table row names exactly one edge,
//! and wildcard characters expand into sets of ground rows.

use crate::design::Design;
use crate::ids::ObjId;
use crate::obj::{Obj, ObjKind};
use crate::pin::PinDir;
use std::collections::BTreeMap;
use volta_diagnostics::DiagnosticSink;
use volta_source::SourceLoc;

/// Transitions out of a state for one pin, split by target level.
#[derive(Clone, Debug, Default)]
struct UdpTransitions {
    zer: Option<String>,
    one: Option<String>,
    xxx: Option<String>,
}

/// One sequential state. The state's output is the first character of its
/// key in the state map.
#[derive(Clone, Debug)]
struct UdpState {
    pins: Vec<UdpTransitions>,
}

/// Payload of a user-defined primitive node.
///
/// Pin 0 is the output; the remaining pins are inputs. The table alphabet
/// (`0 1 x`, edges `r R f F P N`, wildcards `? n p _ *`, and the `-`
/// hold output) is part of the IR boundary.
#[derive(Debug)]
pub struct UdpData {
    sequential: bool,
    init: char,
    npins: u32,
    comb: BTreeMap<String, char>,
    states: BTreeMap<String, UdpState>,
}

impl UdpData {
    fn new(npins: u32, sequential: bool) -> Self {
        Self {
            sequential,
            init: 'x',
            npins,
            comb: BTreeMap::new(),
            states: BTreeMap::new(),
        }
    }

    /// Returns `true` for a sequential UDP.
    pub fn sequential(&self) -> bool {
        self.sequential
    }

    /// Returns the initial output level (`'0'`, `'1'`, or `'x'`).
    pub fn init(&self) -> char {
        self.init
    }

    /// Looks up a combinational row by its ground input pattern.
    pub fn comb_lookup(&self, input: &str) -> Option<char> {
        self.comb.get(input).copied()
    }

    /// Returns the number of combinational rows.
    pub fn comb_len(&self) -> usize {
        self.comb.len()
    }

    /// Returns `true` if the sequential machine has a state with this key.
    pub fn has_state(&self, key: &str) -> bool {
        self.states.contains_key(key)
    }

    /// Returns the number of sequential states.
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Adds a table row. Returns `false` (and reports a diagnostic) if
    /// the row is malformed; the table is left unchanged in that case.
    fn set_table(&mut self, input: &str, output: char, sink: &DiagnosticSink, loc: SourceLoc) -> bool {
        if self.sequential {
            if !matches!(output, '0' | '1' | 'x' | '-') {
                sink.emit(volta_diagnostics::Diagnostic::error(
                    format!("invalid sequential primitive output '{output}'"),
                    loc,
                ));
                return false;
            }
            if input.len() != self.npins as usize {
                sink.emit(volta_diagnostics::Diagnostic::error(
                    format!(
                        "sequential primitive row {:?} needs {} characters, found {}",
                        input,
                        self.npins,
                        input.len()
                    ),
                    loc,
                ));
                return false;
            }
            let chars: Vec<char> = input.chars().collect();
            self.sequ_glob(chars, output, sink, loc)
        } else {
            if !matches!(output, '0' | '1' | 'x') {
                sink.emit(volta_diagnostics::Diagnostic::error(
                    format!("invalid combinational primitive output '{output}'"),
                    loc,
                ));
                return false;
            }
            if input.len() != (self.npins - 1) as usize {
                sink.emit(volta_diagnostics::Diagnostic::error(
                    format!(
                        "combinational primitive row {:?} needs {} characters, found {}",
                        input,
                        self.npins - 1,
                        input.len()
                    ),
                    loc,
                ));
                return false;
            }
            if let Some(bad) = input.chars().find(|c| !matches!(*c, '0' | '1' | 'x')) {
                sink.emit(volta_diagnostics::Diagnostic::error(
                    format!("invalid character '{bad}' in combinational primitive row"),
                    loc,
                ));
                return false;
            }
            self.comb.insert(input.to_string(), output);
            true
        }
    }

    /// Expands wildcard characters recursively, then grounds the row.
    fn sequ_glob(
        &mut self,
        mut input: Vec<char>,
        output: char,
        sink: &DiagnosticSink,
        loc: SourceLoc,
    ) -> bool {
        for idx in 0..input.len() {
            let expansion: &[char] = match input[idx] {
                '0' | '1' | 'x' | 'r' | 'R' | 'f' | 'F' | 'P' | 'N' => continue,
                '?' => &['0', '1', 'x'],
                'n' => &['f', 'F', 'N'],
                'p' => &['r', 'R', 'P'],
                '_' => &['f', 'F'],
                '*' => &['r', 'R', 'f', 'F', 'P', 'N'],
                bad => {
                    sink.emit(volta_diagnostics::Diagnostic::error(
                        format!("invalid character '{bad}' in sequential primitive row"),
                        loc,
                    ));
                    return false;
                }
            };
            for &sub in expansion {
                input[idx] = sub;
                if !self.sequ_glob(input.clone(), output, sink, loc) {
                    return false;
                }
            }
            return true;
        }
        self.set_sequ(input, output, sink, loc)
    }

    /// Installs one ground row containing exactly one edge.
    fn set_sequ(
        &mut self,
        input: Vec<char>,
        output: char,
        sink: &DiagnosticSink,
        loc: SourceLoc,
    ) -> bool {
        let output = if output == '-' { input[0] } else { output };

        let edges: Vec<usize> = input
            .iter()
            .enumerate()
            .filter(|&(_, &c)| !matches!(c, '0' | '1' | 'x'))
            .map(|(i, _)| i)
            .collect();
        if edges.len() != 1 {
            let row: String = input.iter().collect();
            sink.emit(volta_diagnostics::Diagnostic::error(
                format!("sequential primitive row {row:?} must contain exactly one edge"),
                loc,
            ));
            return false;
        }
        let edge = edges[0];

        let mut frm = input.clone();
        let mut to = input;
        to[0] = output;
        match frm[edge] {
            'r' => {
                frm[edge] = '0';
                to[edge] = '1';
            }
            'R' => {
                frm[edge] = 'x';
                to[edge] = '1';
            }
            'f' => {
                frm[edge] = '1';
                to[edge] = '0';
            }
            'F' => {
                frm[edge] = 'x';
                to[edge] = '0';
            }
            'P' => {
                frm[edge] = '0';
                to[edge] = 'x';
            }
            'N' => {
                frm[edge] = '1';
                to[edge] = 'x';
            }
            _ => unreachable!("edge position holds a level character"),
        }

        let target_level = to[edge];
        let frm_key: String = frm.into_iter().collect();
        let to_key: String = to.into_iter().collect();
        self.find_state(&frm_key);
        self.find_state(&to_key);

        let trans = &mut self.states.get_mut(&frm_key).expect("state just created").pins[edge];
        let slot = match target_level {
            '0' => &mut trans.zer,
            '1' => &mut trans.one,
            'x' => &mut trans.xxx,
            _ => unreachable!("edge targets are levels"),
        };
        match slot {
            // I might have caught this edge already.
            Some(existing) if *existing == to_key => {}
            None => *slot = Some(to_key),
            Some(existing) => {
                sink.emit(volta_diagnostics::Diagnostic::error(
                    format!(
                        "conflicting transitions from state {frm_key:?}: {existing:?} and {to_key:?}"
                    ),
                    loc,
                ));
                return false;
            }
        }
        true
    }

    fn find_state(&mut self, key: &str) {
        if !self.states.contains_key(key) {
            self.states.insert(
                key.to_string(),
                UdpState {
                    pins: vec![UdpTransitions::default(); self.npins as usize],
                },
            );
        }
    }

    /// Drops transitions into unknown-output states, then erases
    /// unknown-output states with no outgoing transitions.
    fn cleanup_table(&mut self) {
        for state in self.states.values_mut() {
            for trans in &mut state.pins {
                for slot in [&mut trans.zer, &mut trans.one, &mut trans.xxx] {
                    if slot.as_ref().is_some_and(|key| key.starts_with('x')) {
                        *slot = None;
                    }
                }
            }
        }
        self.states.retain(|key, state| {
            !key.starts_with('x')
                || state
                    .pins
                    .iter()
                    .any(|t| t.zer.is_some() || t.one.is_some() || t.xxx.is_some())
        });
    }

    /// Returns the output of the state reached from `from` when pin `pin`
    /// transitions to level `to`, or `'x'` if no such transition exists.
    fn table_lookup(&self, from: &str, to: char, pin: u32) -> char {
        assert!(pin < self.npins, "pin {pin} out of range");
        assert_eq!(
            from.len(),
            self.npins as usize,
            "state key length must match the pin count"
        );
        let Some(state) = self.states.get(from) else {
            return 'x';
        };
        let trans = &state.pins[pin as usize];
        let target = match to {
            '0' => &trans.zer,
            '1' => &trans.one,
            'x' => &trans.xxx,
            _ => panic!("invalid target level '{to}'"),
        };
        target
            .as_ref()
            .and_then(|key| key.chars().next())
            .unwrap_or('x')
    }

    fn set_initial(&mut self, init: char) {
        assert!(self.sequential, "only sequential primitives take an initial value");
        assert!(
            matches!(init, '0' | '1' | 'x'),
            "invalid initial output '{init}'"
        );
        self.init = init;
    }
}

impl Obj {
    /// Returns the UDP payload, if this object is a user-defined
    /// primitive.
    pub fn as_udp(&self) -> Option<&UdpData> {
        match self.kind() {
            ObjKind::Udp(data) => Some(data),
            _ => None,
        }
    }
}

impl Design {
    /// Creates a user-defined primitive with `pins` total pins (pin 0 is
    /// the output).
    pub fn new_udp(&mut self, name: impl Into<String>, pins: u32, sequential: bool) -> ObjId {
        assert!(pins >= 2, "a primitive needs an output and at least one input");
        let id = self.alloc_obj(name.into(), pins, ObjKind::Udp(UdpData::new(pins, sequential)));
        self.set_pin_role(id, 0, PinDir::Output, "", 0);
        for idx in 1..pins {
            self.set_pin_role(id, idx, PinDir::Input, "", 0);
        }
        id
    }

    /// Adds a row to a UDP's table. Malformed rows are reported through
    /// the design's diagnostic sink and dropped.
    pub fn udp_set_table(&mut self, id: ObjId, input: &str, output: char, loc: SourceLoc) -> bool {
        let Design { objs, sink, .. } = self;
        match objs[id].kind_mut() {
            ObjKind::Udp(data) => data.set_table(input, output, sink, loc),
            _ => panic!("udp_set_table on a non-primitive"),
        }
    }

    /// Runs the table cleanup pass on a UDP.
    pub fn udp_cleanup_table(&mut self, id: ObjId) {
        match self.objs[id].kind_mut() {
            ObjKind::Udp(data) => data.cleanup_table(),
            _ => panic!("udp_cleanup_table on a non-primitive"),
        }
    }

    /// Looks up the output of the successor state. See
    /// [`UdpData`] for the key conventions.
    pub fn udp_table_lookup(&self, id: ObjId, from: &str, to: char, pin: u32) -> char {
        self.objs[id]
            .as_udp()
            .expect("udp_table_lookup on a non-primitive")
            .table_lookup(from, to, pin)
    }

    /// Sets the initial output of a sequential UDP.
    pub fn udp_set_initial(&mut self, id: ObjId, init: char) {
        match self.objs[id].kind_mut() {
            ObjKind::Udp(data) => data.set_initial(init),
            _ => panic!("udp_set_initial on a non-primitive"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comb_udp(design: &mut Design) -> ObjId {
        design.new_udp("u_xor", 3, false)
    }

    fn sequ_udp(design: &mut Design, pins: u32) -> ObjId {
        design.new_udp("u_dff", pins, true)
    }

    #[test]
    fn udp_pin_directions() {
        let mut design = Design::new();
        let id = comb_udp(&mut design);
        let obj = design.obj(id);
        assert_eq!(design.pin(obj.pin(0)).dir(), PinDir::Output);
        assert_eq!(design.pin(obj.pin(1)).dir(), PinDir::Input);
        assert_eq!(design.pin(obj.pin(2)).dir(), PinDir::Input);
    }

    #[test]
    fn combinational_rows() {
        let mut design = Design::new();
        let id = comb_udp(&mut design);
        let loc = SourceLoc::NONE;
        assert!(design.udp_set_table(id, "01", '1', loc));
        assert!(design.udp_set_table(id, "10", '1', loc));
        assert!(design.udp_set_table(id, "00", '0', loc));
        assert!(design.udp_set_table(id, "11", '0', loc));
        let udp = design.obj(id).as_udp().unwrap();
        assert_eq!(udp.comb_lookup("01"), Some('1'));
        assert_eq!(udp.comb_lookup("11"), Some('0'));
        assert_eq!(udp.comb_lookup("0x"), None);
        assert_eq!(udp.comb_len(), 4);
        assert_eq!(design.errors(), 0);
    }

    #[test]
    fn combinational_bad_length_reports() {
        let mut design = Design::new();
        let id = comb_udp(&mut design);
        assert!(!design.udp_set_table(id, "011", '1', SourceLoc::NONE));
        assert_eq!(design.errors(), 1);
        assert_eq!(design.obj(id).as_udp().unwrap().comb_len(), 0);
    }

    #[test]
    fn combinational_bad_character_reports() {
        let mut design = Design::new();
        let id = comb_udp(&mut design);
        assert!(!design.udp_set_table(id, "0r", '1', SourceLoc::NONE));
        assert_eq!(design.errors(), 1);
    }

    #[test]
    fn combinational_bad_output_reports() {
        let mut design = Design::new();
        let id = comb_udp(&mut design);
        assert!(!design.udp_set_table(id, "01", '-', SourceLoc::NONE));
        assert_eq!(design.errors(), 1);
    }

    #[test]
    fn sequential_edge_row() {
        let mut design = Design::new();
        let id = sequ_udp(&mut design, 2);
        assert!(design.udp_set_table(id, "0r", '1', SourceLoc::NONE));
        let udp = design.obj(id).as_udp().unwrap();
        // Rising edge from "00": input pin goes to 1, output becomes 1.
        assert!(udp.has_state("00"));
        assert!(udp.has_state("11"));
        assert_eq!(design.udp_table_lookup(id, "00", '1', 1), '1');
        // No falling transition was defined.
        assert_eq!(design.udp_table_lookup(id, "00", '0', 1), 'x');
    }

    #[test]
    fn sequential_hold_output() {
        let mut design = Design::new();
        let id = sequ_udp(&mut design, 2);
        // '-' keeps the current output: from "1" with a falling input.
        assert!(design.udp_set_table(id, "1f", '-', SourceLoc::NONE));
        let udp = design.obj(id).as_udp().unwrap();
        assert!(udp.has_state("11"));
        assert!(udp.has_state("10"));
        assert_eq!(design.udp_table_lookup(id, "11", '0', 1), '1');
    }

    #[test]
    fn sequential_wildcard_expansion() {
        let mut design = Design::new();
        let id = sequ_udp(&mut design, 2);
        // '?' expands the output level over {0,1,x}; 'r' is the one edge.
        assert!(design.udp_set_table(id, "?r", '1', SourceLoc::NONE));
        assert_eq!(design.udp_table_lookup(id, "00", '1', 1), '1');
        assert_eq!(design.udp_table_lookup(id, "10", '1', 1), '1');
        assert_eq!(design.udp_table_lookup(id, "x0", '1', 1), '1');
    }

    #[test]
    fn sequential_edge_wildcard_expansion() {
        let mut design = Design::new();
        let id = sequ_udp(&mut design, 2);
        // 'p' covers r, R, and P; the P edge targets x, not 1.
        assert!(design.udp_set_table(id, "0p", '1', SourceLoc::NONE));
        assert_eq!(design.udp_table_lookup(id, "00", '1', 1), '1');
        assert_eq!(design.udp_table_lookup(id, "0x", '1', 1), '1');
        assert_eq!(design.udp_table_lookup(id, "00", 'x', 1), '1');
    }

    #[test]
    fn sequential_row_without_edge_reports() {
        let mut design = Design::new();
        let id = sequ_udp(&mut design, 2);
        assert!(!design.udp_set_table(id, "00", '1', SourceLoc::NONE));
        assert_eq!(design.errors(), 1);
    }

    #[test]
    fn sequential_conflicting_transition_reports() {
        let mut design = Design::new();
        let id = sequ_udp(&mut design, 2);
        assert!(design.udp_set_table(id, "0r", '1', SourceLoc::NONE));
        // Same edge, different output: the transition slot is taken.
        assert!(!design.udp_set_table(id, "0r", '0', SourceLoc::NONE));
        assert_eq!(design.errors(), 1);
        // The original transition is intact.
        assert_eq!(design.udp_table_lookup(id, "00", '1', 1), '1');
    }

    #[test]
    fn duplicate_row_is_not_a_conflict() {
        let mut design = Design::new();
        let id = sequ_udp(&mut design, 2);
        assert!(design.udp_set_table(id, "0r", '1', SourceLoc::NONE));
        assert!(design.udp_set_table(id, "0r", '1', SourceLoc::NONE));
        assert_eq!(design.errors(), 0);
    }

    #[test]
    fn cleanup_drops_x_states() {
        let mut design = Design::new();
        let id = sequ_udp(&mut design, 2);
        // The P edge creates a transition into the x-output state "xx"
        // and from-state "00".
        assert!(design.udp_set_table(id, "xP", 'x', SourceLoc::NONE));
        let before = design.obj(id).as_udp().unwrap().state_count();
        assert!(before >= 2);
        design.udp_cleanup_table(id);
        let udp = design.obj(id).as_udp().unwrap();
        // Transitions into x-output states are gone, and x-output states
        // with no outgoing transitions are erased.
        assert!(!udp.has_state("xx"));
        assert_eq!(design.udp_table_lookup(id, "x0", 'x', 1), 'x');
    }

    #[test]
    fn set_initial() {
        let mut design = Design::new();
        let id = sequ_udp(&mut design, 2);
        assert_eq!(design.obj(id).as_udp().unwrap().init(), 'x');
        design.udp_set_initial(id, '1');
        assert_eq!(design.obj(id).as_udp().unwrap().init(), '1');
    }

    #[test]
    #[should_panic(expected = "only sequential")]
    fn set_initial_on_combinational_panics() {
        let mut design = Design::new();
        let id = comb_udp(&mut design);
        design.udp_set_initial(id, '1');
    }
}
