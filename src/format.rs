use crate::decoder::{Annotation, AnnotationKind};

/// Display string the way the capture host shows it.
pub fn fmt_annotation(a: &Annotation) -> String {
    match a.kind {
        AnnotationKind::Strobe => format!("{}: {} (val={})", a.dir, a.label, a.value_hex()),
        AnnotationKind::Debug => format!("{} {}", a.dir, a.label),
    }
}

/// One listing line: start time in seconds, then the display string.
pub fn fmt_line(a: &Annotation) -> String {
    format!("{:>14.9}  {}", a.start.as_secs_f64(), fmt_annotation(a))
}
