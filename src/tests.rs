use cgmath::{Point2, Point3, Vector3};
use failure::Error as TestError;

use crate::{CountingSink, Error, Face, MeshCollector, MeshData, Reader, Writer};


// ===========================================================================
// ===== Helpers
// ===========================================================================

/// The mesh from the original test suite: three vertices, one face.
fn triangle_mesh(name: &str) -> MeshData {
    let mut mesh = MeshData::new(name);
    mesh.vertices.push(Point3::new(0.0, 0.0, 0.0));
    mesh.vertices.push(Point3::new(1.0, 0.0, 0.0));
    mesh.vertices.push(Point3::new(1.0, 1.0, 0.0));
    mesh.faces.push(Face::new([0, 1, 2]));
    mesh
}

fn write_to_memory(meshes: &[MeshData]) -> Result<Vec<u8>, Error> {
    let mut out = Vec::new();
    let mut writer = Writer::new(&mut out);
    for mesh in meshes {
        writer.write(mesh)?;
    }
    writer.close()?;
    Ok(out)
}

fn read_back(input: &[u8]) -> Result<Vec<MeshData>, Error> {
    let mut collector = MeshCollector::new();
    Reader::new(input).read_into(&mut collector)?;
    Ok(collector.meshes)
}

fn read_err(input: &[u8]) -> Error {
    let mut collector = MeshCollector::new();
    Reader::new(input)
        .read_into(&mut collector)
        .expect_err("expected reading to fail")
}


// ===========================================================================
// ===== Round trips
// ===========================================================================

#[test]
fn one_mesh_round_trips() -> Result<(), TestError> {
    let mesh = triangle_mesh("mesh");
    let encoded = write_to_memory(&[mesh.clone()])?;
    let meshes = read_back(&encoded)?;

    assert_eq!(meshes.len(), 1);
    assert_eq!(meshes[0], mesh);

    Ok(())
}

#[test]
fn one_mesh_exact_output() -> Result<(), TestError> {
    let encoded = write_to_memory(&[triangle_mesh("mesh")])?;
    assert_eq!(
        std::str::from_utf8(&encoded)?,
        "o mesh\n\
         v 0 0 0\n\
         v 1 0 0\n\
         v 1 1 0\n\
         f 1 2 3\n",
    );

    Ok(())
}

#[test]
fn two_meshes_round_trip_with_local_indices() -> Result<(), TestError> {
    let mesh1 = triangle_mesh("mesh1");
    let mesh2 = triangle_mesh("mesh2");
    let encoded = write_to_memory(&[mesh1.clone(), mesh2.clone()])?;

    // The file numbers mesh2's vertices 4 to 6...
    let text = std::str::from_utf8(&encoded)?;
    assert!(text.contains("f 1 2 3\n"));
    assert!(text.contains("f 4 5 6\n"));

    // ... but both meshes come back with local zero-based indices.
    let meshes = read_back(&encoded)?;
    assert_eq!(meshes.len(), 2);
    assert_eq!(meshes[0], mesh1);
    assert_eq!(meshes[1], mesh2);
    assert_eq!(meshes[1].faces[0].vertices, [0, 1, 2]);

    Ok(())
}

#[test]
fn awkward_doubles_round_trip_bit_exactly() -> Result<(), TestError> {
    let mut mesh = MeshData::new("precision");
    mesh.vertices.push(Point3::new(0.1, 1.0 / 3.0, -1.5e-30));
    mesh.vertices.push(Point3::new(f64::MIN_POSITIVE, -0.0, 12345.678901234567));
    mesh.vertices.push(Point3::new(2e300, -7.2e-18, 0.30000000000000004));
    mesh.faces.push(Face::new([0, 1, 2]));

    let encoded = write_to_memory(&[mesh.clone()])?;
    let meshes = read_back(&encoded)?;

    assert_eq!(meshes.len(), 1);
    for (read, written) in meshes[0].vertices.iter().zip(&mesh.vertices) {
        assert_eq!(read.x.to_bits(), written.x.to_bits());
        assert_eq!(read.y.to_bits(), written.y.to_bits());
        assert_eq!(read.z.to_bits(), written.z.to_bits());
    }

    Ok(())
}

#[test]
fn normals_and_texcoords_round_trip() -> Result<(), TestError> {
    let mut mesh = triangle_mesh("textured");
    mesh.normals.push(Vector3::new(0.0, 0.0, 1.0));
    mesh.texcoords.push(Point2::new(0.0, 0.0));
    mesh.texcoords.push(Point2::new(1.0, 0.0));
    mesh.texcoords.push(Point2::new(1.0, 1.0));
    mesh.faces[0].normals = Some([0, 0, 0]);
    mesh.faces[0].texcoords = Some([0, 1, 2]);

    let encoded = write_to_memory(&[mesh.clone()])?;
    let text = std::str::from_utf8(&encoded)?;
    assert!(text.contains("f 1/1/1 2/2/1 3/3/1\n"));

    let meshes = read_back(&encoded)?;
    assert_eq!(meshes.len(), 1);
    assert_eq!(meshes[0], mesh);

    Ok(())
}

#[test]
fn normals_only_use_double_slash_form() -> Result<(), TestError> {
    let mut mesh = triangle_mesh("smooth");
    mesh.normals.push(Vector3::new(0.0, 0.0, 1.0));
    mesh.faces[0].normals = Some([0, 0, 0]);

    let encoded = write_to_memory(&[mesh.clone()])?;
    let text = std::str::from_utf8(&encoded)?;
    assert!(text.contains("f 1//1 2//1 3//1\n"));

    let meshes = read_back(&encoded)?;
    assert_eq!(meshes[0], mesh);
    assert_eq!(meshes[0].faces[0].texcoords, None);

    Ok(())
}

#[test]
fn two_textured_meshes_rebase_every_index_kind() -> Result<(), TestError> {
    let mut mesh = triangle_mesh("m");
    mesh.normals.push(Vector3::new(0.0, 0.0, 1.0));
    mesh.texcoords.push(Point2::new(0.5, 0.5));
    mesh.faces[0].normals = Some([0, 0, 0]);
    mesh.faces[0].texcoords = Some([0, 0, 0]);

    let encoded = write_to_memory(&[mesh.clone(), mesh.clone()])?;
    let text = std::str::from_utf8(&encoded)?;
    assert!(text.contains("f 1/1/1 2/1/1 3/1/1\n"));
    assert!(text.contains("f 4/2/2 5/2/2 6/2/2\n"));

    let meshes = read_back(&encoded)?;
    assert_eq!(meshes.len(), 2);
    assert_eq!(meshes[1], mesh);

    Ok(())
}

#[test]
fn file_round_trip() -> Result<(), TestError> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("triangle.obj");

    let mesh = triangle_mesh("mesh");
    let mut writer = Writer::create(&path)?;
    writer.write(&mesh)?;
    writer.close()?;

    let mut collector = MeshCollector::new();
    Reader::open(&path)?.read_into(&mut collector)?;

    assert_eq!(collector.meshes.len(), 1);
    assert_eq!(collector.meshes[0], mesh);

    Ok(())
}


// ===========================================================================
// ===== Reading corner cases
// ===========================================================================

#[test]
fn empty_input_yields_no_meshes() -> Result<(), TestError> {
    assert_eq!(read_back(b"")?.len(), 0);
    assert_eq!(read_back(b"\n  \n# only a comment\n")?.len(), 0);
    Ok(())
}

#[test]
fn unknown_keywords_are_skipped() -> Result<(), TestError> {
    let data = b"mtllib foo.mtl\n\
        o mesh\n\
        usemtl shiny\n\
        v 0 0 0\n\
        v 1 0 0\n\
        v 1 1 0\n\
        s off\n\
        f 1 2 3\n" as &[u8];

    let meshes = read_back(data)?;
    assert_eq!(meshes.len(), 1);
    assert_eq!(meshes[0], triangle_mesh("mesh"));

    Ok(())
}

#[test]
fn geometry_before_name_directive_opens_anonymous_mesh() -> Result<(), TestError> {
    let data = b"v 0 0 0\nv 1 0 0\nv 1 1 0\nf 1 2 3\no named\nv 2 2 2\n" as &[u8];

    let meshes = read_back(data)?;
    assert_eq!(meshes.len(), 2);
    assert_eq!(meshes[0].name, "");
    assert_eq!(meshes[0].faces[0].vertices, [0, 1, 2]);
    assert_eq!(meshes[1].name, "named");
    assert_eq!(meshes[1].vertices, vec![Point3::new(2.0, 2.0, 2.0)]);

    Ok(())
}

#[test]
fn group_directive_also_begins_a_mesh() -> Result<(), TestError> {
    let data = b"g left part\nv 0 0 0\nv 1 0 0\nv 1 1 0\nf 1 2 3\n" as &[u8];

    let meshes = read_back(data)?;
    assert_eq!(meshes.len(), 1);
    // Names may contain spaces.
    assert_eq!(meshes[0].name, "left part");

    Ok(())
}

#[test]
fn negative_indices_resolve_from_pool_end() -> Result<(), TestError> {
    let data = b"o mesh\nv 0 0 0\nv 1 0 0\nv 1 1 0\nf -3 -2 -1\n" as &[u8];

    let meshes = read_back(data)?;
    assert_eq!(meshes[0].faces[0].vertices, [0, 1, 2]);

    Ok(())
}

#[test]
fn windows_line_endings_are_fine() -> Result<(), TestError> {
    let data = b"o mesh\r\nv 0 0 0\r\nv 1 0 0\r\nv 1 1 0\r\nf 1 2 3\r\n" as &[u8];
    assert_eq!(read_back(data)?[0], triangle_mesh("mesh"));
    Ok(())
}

#[test]
fn counting_sink_counts() -> Result<(), TestError> {
    let encoded = write_to_memory(&[triangle_mesh("a"), triangle_mesh("b")])?;

    let mut counter = CountingSink::new();
    Reader::new(&encoded[..]).read_into(&mut counter)?;

    assert_eq!(counter.mesh_names, vec!["a".to_string(), "b".to_string()]);
    assert_eq!(counter.vertex_count, 6);
    assert_eq!(counter.face_count, 2);

    Ok(())
}


// ===========================================================================
// ===== Format errors
// ===========================================================================

#[test]
fn face_with_two_corners_is_rejected() {
    let err = read_err(b"o mesh\nv 0 0 0\nv 1 0 0\nf 1 2\n");
    assert!(err.is_format_error());
}

#[test]
fn quad_face_is_rejected_not_triangulated() {
    let err = read_err(
        b"o mesh\nv 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n",
    );
    assert!(err.is_format_error());
}

#[test]
fn zero_index_is_rejected() {
    let err = read_err(b"o mesh\nv 0 0 0\nv 1 0 0\nv 1 1 0\nf 0 1 2\n");
    assert!(err.is_format_error());
}

#[test]
fn out_of_range_index_is_rejected() {
    let err = read_err(b"o mesh\nv 0 0 0\nv 1 0 0\nv 1 1 0\nf 1 2 7\n");
    assert!(err.is_format_error());
}

#[test]
fn index_into_previous_object_is_rejected() {
    let data = b"o first\nv 0 0 0\nv 1 0 0\nv 1 1 0\n\
        o second\nv 2 0 0\nv 2 1 0\nf 1 4 5\n";
    let err = read_err(data);
    assert!(err.is_format_error());
}

#[test]
fn inconsistent_corner_forms_are_rejected() {
    let data = b"o mesh\nv 0 0 0\nv 1 0 0\nv 1 1 0\nvt 0 0\nf 1/1 2 3\n";
    let err = read_err(data);
    assert!(err.is_format_error());
}

#[test]
fn truncated_vertex_record_is_rejected() {
    let err = read_err(b"o mesh\nv 0 0\n");
    assert!(err.is_format_error());
}

#[test]
fn non_numeric_coordinate_is_rejected() {
    let err = read_err(b"o mesh\nv zero 0 0\n");
    assert!(err.is_format_error());
}

#[test]
fn format_errors_name_the_offending_line() {
    let err = read_err(b"o mesh\nv 0 0 0\nv 1 0 0\nv 1 1 0\nf 1 2\n");
    match err {
        Error::Format { line, .. } => assert_eq!(line, 5),
        other => panic!("expected format error, got {:?}", other),
    }
    assert!(format!("{}", read_err(b"o mesh\nv oops 0 0\n")).contains("line 2"));
}


// ===========================================================================
// ===== Writer usage
// ===========================================================================

#[test]
fn write_after_close_fails_without_emitting_bytes() -> Result<(), TestError> {
    let mesh = triangle_mesh("mesh");
    let expected = write_to_memory(&[mesh.clone()])?;

    let mut out = Vec::new();
    let mut writer = Writer::new(&mut out);
    writer.write(&mesh)?;
    writer.close()?;

    match writer.write(&mesh) {
        Err(Error::StreamClosed) => {}
        other => panic!("expected StreamClosed, got {:?}", other.map(|_| ())),
    }
    match writer.close() {
        Err(Error::StreamClosed) => {}
        other => panic!("expected StreamClosed, got {:?}", other.map(|_| ())),
    }
    drop(writer);

    assert_eq!(out, expected);

    Ok(())
}
