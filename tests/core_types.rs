use detpost::lowlevel::TensorView;
use detpost::{
    iou, ArchitectureTag, DetPostError, ErrorKind, FrameSize, PostProcessConfig, PostProcessor,
    Rect, Thresholds,
};

#[test]
fn tensor_view_rejects_length_mismatch() {
    let data = [0.0f32; 5];

    let err = TensorView::new(&data, 2, 3).err().unwrap();
    assert_eq!(err, DetPostError::ShapeMismatch { expected: 6, got: 5 });

    let long = [0.0f32; 7];
    let err = TensorView::new(&long, 2, 3).err().unwrap();
    assert_eq!(err, DetPostError::ShapeMismatch { expected: 6, got: 7 });
}

#[test]
fn tensor_view_rows_and_columns() {
    let data: Vec<f32> = (0..6).map(|v| v as f32).collect();
    let view = TensorView::new(&data, 2, 3).unwrap();
    assert_eq!(view.rows(), 2);
    assert_eq!(view.cols(), 3);
    assert_eq!(view.row(1), Some(&[3.0, 4.0, 5.0][..]));
    assert_eq!(view.row(2), None);
    assert_eq!(view.get(0, 2), Some(2.0));
    assert_eq!(view.column(1).collect::<Vec<_>>(), vec![1.0, 4.0]);
}

#[test]
fn iou_of_box_with_itself_is_one() {
    let a = Rect::new(3, 4, 20, 10);
    assert_eq!(iou(&a, &a), 1.0);
}

#[test]
fn iou_of_disjoint_boxes_is_zero() {
    let a = Rect::new(0, 0, 10, 10);
    let b = Rect::new(10, 0, 10, 10);
    let c = Rect::new(40, 40, 5, 5);
    assert_eq!(iou(&a, &b), 0.0);
    assert_eq!(iou(&a, &c), 0.0);
}

#[test]
fn iou_is_symmetric() {
    let pairs = [
        (Rect::new(0, 0, 10, 10), Rect::new(5, 5, 10, 10)),
        (Rect::new(2, 1, 7, 13), Rect::new(0, 4, 30, 3)),
        (Rect::new(0, 0, 100, 100), Rect::new(25, 25, 50, 50)),
    ];
    for (a, b) in pairs {
        assert_eq!(iou(&a, &b), iou(&b, &a));
    }
    assert_eq!(iou(&pairs[2].0, &pairs[2].1), 0.25);
}

#[test]
fn degenerate_boxes_have_zero_iou() {
    let empty = Rect::new(5, 5, 0, 0);
    assert_eq!(iou(&empty, &empty), 0.0);
    assert_eq!(iou(&empty, &Rect::new(0, 0, 10, 10)), 0.0);
}

#[test]
fn architecture_tags_parse_loosely() {
    assert_eq!("YOLOv5".parse::<ArchitectureTag>(), Ok(ArchitectureTag::YoloV5));
    assert_eq!("yolo_v8".parse::<ArchitectureTag>(), Ok(ArchitectureTag::YoloV8));
    assert_eq!("yolov10".parse::<ArchitectureTag>(), Ok(ArchitectureTag::YoloV10));
    assert_eq!("SSD".parse::<ArchitectureTag>(), Ok(ArchitectureTag::Ssd));
    assert_eq!(
        "semantic-segmentation".parse::<ArchitectureTag>(),
        Ok(ArchitectureTag::Semantic)
    );
    assert_eq!("detr".parse::<ArchitectureTag>(), Ok(ArchitectureTag::Unknown));
}

#[test]
fn processor_rejects_bad_configuration() {
    let err = PostProcessor::new(PostProcessConfig::default()).err().unwrap();
    assert_eq!(
        err,
        DetPostError::UnsupportedArchitecture(ArchitectureTag::Unknown)
    );
    assert_eq!(err.kind(), ErrorKind::Configuration);

    let config = PostProcessConfig::new(ArchitectureTag::YoloV8, Thresholds::default(), 0);
    let err = PostProcessor::new(config).err().unwrap();
    assert_eq!(
        err,
        DetPostError::InvalidClassCount {
            arch: ArchitectureTag::YoloV8,
            num_classes: 0,
        }
    );

    let config = PostProcessConfig::new(ArchitectureTag::Ssd, Thresholds::new(1.5, 0.5), 0);
    let err = PostProcessor::new(config).err().unwrap();
    assert_eq!(
        err,
        DetPostError::InvalidThreshold {
            name: "confidence",
            value: 1.5,
        }
    );

    let config = PostProcessConfig::new(ArchitectureTag::Ssd, Thresholds::new(0.5, f32::NAN), 0);
    assert!(PostProcessor::new(config).unwrap_err().is_configuration());

    let config = PostProcessConfig::new(ArchitectureTag::Ssd, Thresholds::new(0.0, 0.5), 0);
    assert!(PostProcessor::new(config).unwrap_err().is_configuration());

    let config = PostProcessConfig::new(ArchitectureTag::Ssd, Thresholds::new(0.5, 1.0), 0);
    let err = PostProcessor::new(config).err().unwrap();
    assert_eq!(
        err,
        DetPostError::InvalidThreshold {
            name: "iou",
            value: 1.0,
        }
    );
}

#[test]
fn zero_frame_size_is_an_input_error() {
    let config = PostProcessConfig::new(ArchitectureTag::Ssd, Thresholds::default(), 0);
    let processor = PostProcessor::new(config).unwrap();
    let row = [0.0, 0.1, 0.1, 0.5, 0.5, 1.0, 0.9];
    let err = processor.detect(&row, 1, FrameSize::new(0, 10)).unwrap_err();
    assert_eq!(err, DetPostError::InvalidDimensions { width: 0, height: 10 });
    assert_eq!(err.kind(), ErrorKind::InputShape);
}
