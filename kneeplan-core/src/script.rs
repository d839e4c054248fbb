/// Planning event scripts
///
/// One event per line, `#` starts a comment:
///
/// ```text
/// landmark femurCenter 0 0 0
/// landmark hipCenter 0 0 100
/// varus +1
/// flexion -2
/// resection 5.5
/// remove hipCenter
/// ```
use nalgebra::Point3;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{i32 as signed_int, multispace0, multispace1},
    combinator::all_consuming,
    number::complete::double,
    sequence::{preceded, terminated},
    IResult,
};

use crate::error::{PlanError, Result};
use crate::landmark::LandmarkName;

/// An input event from the picking/UI layer.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanEvent {
    PlaceLandmark {
        name: LandmarkName,
        position: Point3<f64>,
    },
    RemoveLandmark(LandmarkName),
    /// Varus/valgus step delta.
    VarusValgus(i32),
    /// Flexion/extension step delta.
    FlexionExtension(i32),
    /// Distal resection offset delta in mm.
    DistalResection(f64),
}

enum RawEvent<'a> {
    Landmark(&'a str, (f64, f64, f64)),
    Remove(&'a str),
    Varus(i32),
    Flexion(i32),
    Resection(f64),
}

/// Parse a whole script into events, in order.
pub fn parse_script(input: &str) -> Result<Vec<PlanEvent>> {
    let mut events = Vec::new();
    for (index, line) in input.lines().enumerate() {
        if let Some(event) = parse_line(line, index + 1)? {
            events.push(event);
        }
    }
    Ok(events)
}

/// Parse one line; blank and comment-only lines yield `None`.
pub fn parse_line(line: &str, line_number: usize) -> Result<Option<PlanEvent>> {
    let text = match line.split_once('#') {
        Some((before, _)) => before,
        None => line,
    };
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }

    let script_error = |message: String| PlanError::Script {
        line: line_number,
        message,
    };

    let (_, raw) = all_consuming(terminated(parse_event, multispace0))(text)
        .map_err(|_| script_error(format!("unrecognised event `{text}`")))?;

    let event = match raw {
        RawEvent::Landmark(name, (x, y, z)) => PlanEvent::PlaceLandmark {
            name: name.parse::<LandmarkName>().map_err(|e: PlanError| script_error(e.to_string()))?,
            position: Point3::new(x, y, z),
        },
        RawEvent::Remove(name) => PlanEvent::RemoveLandmark(
            name.parse::<LandmarkName>().map_err(|e: PlanError| script_error(e.to_string()))?,
        ),
        RawEvent::Varus(delta) => PlanEvent::VarusValgus(delta),
        RawEvent::Flexion(delta) => PlanEvent::FlexionExtension(delta),
        RawEvent::Resection(delta) => PlanEvent::DistalResection(delta),
    };
    Ok(Some(event))
}

fn parse_event(input: &str) -> IResult<&str, RawEvent<'_>> {
    alt((
        parse_landmark,
        parse_remove,
        parse_varus,
        parse_flexion,
        parse_resection,
    ))(input)
}

fn parse_landmark(input: &str) -> IResult<&str, RawEvent<'_>> {
    let (input, _) = tag("landmark")(input)?;
    let (input, name) = preceded(multispace1, parse_name)(input)?;
    let (input, position) = parse_vector3(input)?;
    Ok((input, RawEvent::Landmark(name, position)))
}

fn parse_remove(input: &str) -> IResult<&str, RawEvent<'_>> {
    let (input, _) = tag("remove")(input)?;
    let (input, name) = preceded(multispace1, parse_name)(input)?;
    Ok((input, RawEvent::Remove(name)))
}

fn parse_varus(input: &str) -> IResult<&str, RawEvent<'_>> {
    let (input, _) = tag("varus")(input)?;
    let (input, delta) = preceded(multispace1, signed_int)(input)?;
    Ok((input, RawEvent::Varus(delta)))
}

fn parse_flexion(input: &str) -> IResult<&str, RawEvent<'_>> {
    let (input, _) = tag("flexion")(input)?;
    let (input, delta) = preceded(multispace1, signed_int)(input)?;
    Ok((input, RawEvent::Flexion(delta)))
}

fn parse_resection(input: &str) -> IResult<&str, RawEvent<'_>> {
    let (input, _) = tag("resection")(input)?;
    let (input, delta) = preceded(multispace1, double)(input)?;
    Ok((input, RawEvent::Resection(delta)))
}

fn parse_name(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !c.is_whitespace())(input)
}

fn parse_vector3(input: &str) -> IResult<&str, (f64, f64, f64)> {
    let (input, x) = preceded(multispace1, double)(input)?;
    let (input, y) = preceded(multispace1, double)(input)?;
    let (input, z) = preceded(multispace1, double)(input)?;
    Ok((input, (x, y, z)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::Landmark;

    #[test]
    fn test_parse_script() {
        let script = "\
# right femur
landmark femurCenter 0 0 0
landmark hipCenter 0.5 -1e1 100   # trailing comment

varus +1
varus -3
flexion 2
resection -4.5
remove hipCenter
";
        let events = parse_script(script).unwrap();
        assert_eq!(
            events,
            vec![
                PlanEvent::PlaceLandmark {
                    name: Landmark::FemurCenter.into(),
                    position: Point3::new(0.0, 0.0, 0.0),
                },
                PlanEvent::PlaceLandmark {
                    name: Landmark::HipCenter.into(),
                    position: Point3::new(0.5, -10.0, 100.0),
                },
                PlanEvent::VarusValgus(1),
                PlanEvent::VarusValgus(-3),
                PlanEvent::FlexionExtension(2),
                PlanEvent::DistalResection(-4.5),
                PlanEvent::RemoveLandmark(Landmark::HipCenter.into()),
            ]
        );
    }

    #[test]
    fn test_custom_landmark_names_are_kept() {
        let event = parse_line("landmark tibialTubercle 1 2 3", 1).unwrap();
        assert_eq!(
            event,
            Some(PlanEvent::PlaceLandmark {
                name: LandmarkName::Custom("tibialTubercle".to_string()),
                position: Point3::new(1.0, 2.0, 3.0),
            })
        );
    }

    #[test]
    fn test_errors_carry_line_numbers() {
        let err = parse_script("landmark femurCenter 0 0 0\nvarus 1.5\n").unwrap_err();
        assert!(matches!(err, PlanError::Script { line: 2, .. }));

        let err = parse_script("\n\nlandmark femurCenter 0 0\n").unwrap_err();
        assert!(matches!(err, PlanError::Script { line: 3, .. }));

        let err = parse_script("landmark 9lives 0 0 0").unwrap_err();
        assert!(matches!(err, PlanError::Script { line: 1, .. }));

        assert!(parse_script("rotate 5").is_err());
    }
}
